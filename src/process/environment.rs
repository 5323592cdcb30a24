//! Layering of loaded values over the inherited environment.

use crate::domain::{AmbientPrecedence, EnvMapping};

/// Final environment for the child.
///
/// Without `inherit` the child sees only `loaded`. Otherwise `precedence`
/// decides whether loaded values overwrite inherited ones (`Lowest`) or only
/// fill keys the inherited environment lacks (`Highest`).
pub fn compose_environment(
    ambient: &EnvMapping,
    loaded: &EnvMapping,
    inherit: bool,
    precedence: AmbientPrecedence,
) -> EnvMapping {
    if !inherit {
        return loaded.clone();
    }

    let mut env = ambient.clone();
    for (key, value) in loaded.iter() {
        match precedence {
            AmbientPrecedence::Lowest => {
                env.insert(key, value);
            }
            AmbientPrecedence::Highest => {
                env.insert_if_absent(key, value);
            }
        }
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> EnvMapping {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_loaded_values_beat_ambient_by_default() {
        let env = compose_environment(
            &mapping(&[("A", "ambient"), ("HOME", "/h")]),
            &mapping(&[("A", "file"), ("B", "file")]),
            true,
            AmbientPrecedence::Lowest,
        );
        assert_eq!(env.get("A"), Some("file"));
        assert_eq!(env.get("B"), Some("file"));
        assert_eq!(env.get("HOME"), Some("/h"));
    }

    #[test]
    fn test_ambient_highest_precedence() {
        let env = compose_environment(
            &mapping(&[("A", "ambient")]),
            &mapping(&[("A", "file"), ("B", "file")]),
            true,
            AmbientPrecedence::Highest,
        );
        assert_eq!(env.get("A"), Some("ambient"));
        assert_eq!(env.get("B"), Some("file"));
    }

    #[test]
    fn test_without_inherit_only_loaded_values() {
        let env = compose_environment(
            &mapping(&[("HOME", "/h")]),
            &mapping(&[("A", "1")]),
            false,
            AmbientPrecedence::Highest,
        );
        assert_eq!(env, mapping(&[("A", "1")]));
    }
}
