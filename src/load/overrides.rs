//! Inline `KEY=VALUE` overrides from the command line or config file.

use super::parser::KEY_PATTERN;
use super::LoadedEnv;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static OVERRIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?s)^({KEY_PATTERN})=(.*)$")).expect("valid regex"));

/// Split `KEY=VALUE`. The value may be empty or contain further `=`.
pub fn parse_override(raw: &str) -> Result<(String, String)> {
    let caps = OVERRIDE.captures(raw).ok_or_else(|| Error::InvalidOverride(raw.to_string()))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

pub fn parse_overrides(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter().map(|r| parse_override(r)).collect()
}

/// Overrides always overwrite file values, whatever the cascade setting.
pub fn apply_overrides(loaded: &mut LoadedEnv, overrides: &[(String, String)]) {
    for (key, value) in overrides {
        debug!("Applying override for {key}");
        loaded.set(key, value, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override("FOO=1").expect("valid"), ("FOO".to_string(), "1".to_string()));
        assert_eq!(parse_override("EMPTY=").expect("valid").1, "");
        assert_eq!(parse_override("URL=a=b").expect("valid").1, "a=b");
    }

    #[test]
    fn test_invalid_overrides() {
        for bad in ["FOO", "=1", "1FOO=x", "FOO BAR=1", ""] {
            assert!(
                matches!(parse_override(bad), Err(Error::InvalidOverride(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_override_sets_missing_key() {
        let mut loaded = LoadedEnv::default();
        apply_overrides(&mut loaded, &[("FOO".to_string(), "1".to_string())]);
        assert_eq!(loaded.mapping.get("FOO"), Some("1"));
    }

    #[test]
    fn test_override_replaces_literal_file_value() {
        let mut loaded = LoadedEnv::default();
        loaded.set("FOO", "${raw}", true);
        apply_overrides(&mut loaded, &[("FOO".to_string(), "${BAR}".to_string())]);
        assert_eq!(loaded.mapping.get("FOO"), Some("${BAR}"));
        assert!(!loaded.literal.contains("FOO"));
    }
}
