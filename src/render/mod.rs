//! Printing a resolved mapping (`--print-env`)

use crate::domain::EnvMapping;
use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PrintFormat {
    /// `KEY=value` lines that parse back to the same strings. Values holding
    /// `'` or a newline are double-quoted, so a `$NAME` inside them is
    /// expanded again if the output is loaded as an env file.
    Dotenv,
    /// A JSON object with sorted keys
    Json,
}

pub fn render_mapping(mapping: &EnvMapping, format: PrintFormat) -> Result<String> {
    match format {
        PrintFormat::Dotenv => Ok(render_dotenv(mapping)),
        PrintFormat::Json => {
            let sorted: BTreeMap<&str, &str> = mapping.iter().collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&sorted)?))
        }
    }
}

fn render_dotenv(mapping: &EnvMapping) -> String {
    let mut out = String::new();
    for (key, value) in mapping.iter() {
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_value(value));
        out.push('\n');
    }
    out
}

/// Bare when safe, single-quoted when possible (never expanded on reload),
/// double-quoted with escapes otherwise.
fn quote_value(value: &str) -> String {
    let bare = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '+' | ','));
    if bare {
        return value.to_string();
    }
    if !value.contains('\'') && !value.contains('\n') && !value.contains('\r') {
        return format!("'{value}'");
    }
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand_mapping;
    use crate::load::parser::parse_str;
    use crate::load::{merge_assignments, LoadedEnv};

    fn mapping(pairs: &[(&str, &str)]) -> EnvMapping {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_dotenv_quoting() {
        let m = mapping(&[("A", "plain"), ("B", "has space"), ("C", "it's\nmulti"), ("D", "")]);
        let out = render_mapping(&m, PrintFormat::Dotenv).expect("render");
        assert_eq!(out, "A=plain\nB='has space'\nC=\"it's\\nmulti\"\nD=\n");
    }

    #[test]
    fn test_dotenv_output_parses_back() {
        let m = mapping(&[("A", "${NOT_EXPANDED}"), ("B", "q\"uote's\\"), ("C", "# not a comment")]);
        let out = render_mapping(&m, PrintFormat::Dotenv).expect("render");
        let parsed: Vec<(String, String)> =
            parse_str(&out).expect("parse").into_iter().map(|a| (a.key, a.value)).collect();
        let expected: Vec<(String, String)> =
            m.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_dotenv_output_reloads_with_expansion() {
        let m = mapping(&[("A", "${B}"), ("B", "$HOME/x y"), ("C", "it's")]);
        let out = render_mapping(&m, PrintFormat::Dotenv).expect("render");
        let mut loaded = LoadedEnv::default();
        merge_assignments(&mut loaded, &parse_str(&out).expect("parse"), true);
        let fallback = mapping(&[("HOME", "/home/u"), ("B", "ambient")]);
        assert_eq!(expand_mapping(&loaded, &fallback), m);
    }

    #[test]
    fn test_double_quoted_values_expand_on_reload() {
        let m = mapping(&[("A", "it's $HOME")]);
        let out = render_mapping(&m, PrintFormat::Dotenv).expect("render");
        assert_eq!(out, "A=\"it's $HOME\"\n");
        let mut loaded = LoadedEnv::default();
        merge_assignments(&mut loaded, &parse_str(&out).expect("parse"), true);
        let reloaded = expand_mapping(&loaded, &mapping(&[("HOME", "/home/u")]));
        assert_eq!(reloaded.get("A"), Some("it's /home/u"));
    }

    #[test]
    fn test_json_sorted_keys() {
        let m = mapping(&[("Z", "1"), ("A", "2")]);
        let out = render_mapping(&m, PrintFormat::Json).expect("render");
        assert!(out.find("\"A\"").expect("A") < out.find("\"Z\"").expect("Z"));
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["Z"], "1");
    }
}
