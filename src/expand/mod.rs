//! Variable interpolation
//!
//! Resolves `${NAME}`, `${NAME:-default}` and bare `$NAME` references. A
//! reference receives the fully resolved value of the key it names, but
//! substituted text is never scanned again. Cyclic definitions leave the
//! reference that closes the cycle as written, as do unknown references.

use crate::domain::{ArgExpansion, EnvMapping};
use crate::load::LoadedEnv;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.\-]*)(?::-([^}]*))?\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid regex")
});

fn reference_name<'c>(caps: &'c Captures<'_>) -> &'c str {
    caps.get(1).or_else(|| caps.get(3)).map_or("", |m| m.as_str())
}

fn substitute<F>(value: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    REFERENCE
        .replace_all(value, |caps: &Captures<'_>| {
            let name = reference_name(caps);
            match (lookup(name), caps.get(2)) {
                (Some(found), Some(default)) if found.is_empty() => default.as_str().to_string(),
                (Some(found), _) => found,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Expand every reference in `value` through `lookup`.
pub fn expand_value<'a, F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    substitute(value, |name| lookup(name).map(str::to_string))
}

/// On-demand resolution of mapping keys, memoised per key.
struct Resolver<'a> {
    loaded: &'a LoadedEnv,
    fallback: &'a EnvMapping,
    resolved: HashMap<String, String>,
    in_progress: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn new(loaded: &'a LoadedEnv, fallback: &'a EnvMapping) -> Self {
        Self { loaded, fallback, resolved: HashMap::new(), in_progress: HashSet::new() }
    }

    /// Final value of `key`, or `None` while `key` is still being resolved.
    fn resolve(&mut self, key: &str) -> Option<String> {
        if let Some(done) = self.resolved.get(key) {
            return Some(done.clone());
        }
        let raw = self.loaded.mapping.get(key)?.to_string();
        if self.loaded.literal.contains(key) {
            return Some(raw);
        }
        if !self.in_progress.insert(key.to_string()) {
            return None;
        }
        let expanded = substitute(&raw, |name| self.reference(name, key));
        self.in_progress.remove(key);
        self.resolved.insert(key.to_string(), expanded.clone());
        Some(expanded)
    }

    fn reference(&mut self, name: &str, from: &str) -> Option<String> {
        if name != from && self.loaded.mapping.contains_key(name) {
            return self.resolve(name);
        }
        self.fallback.get(name).map(str::to_string)
    }
}

/// Expand all non-literal values of the merged file mapping.
///
/// A reference resolves against the mapping first, then `fallback` (usually
/// the inherited process environment); the order keys were loaded in does
/// not matter. A value that refers to its own key sees only the fallback, so
/// `PATH=${PATH}:/opt/bin` extends the inherited `PATH`.
pub fn expand_mapping(loaded: &LoadedEnv, fallback: &EnvMapping) -> EnvMapping {
    let mut resolver = Resolver::new(loaded, fallback);
    loaded
        .mapping
        .iter()
        .map(|(key, raw)| {
            let value = resolver.resolve(key).unwrap_or_else(|| raw.to_string());
            (key.to_string(), value)
        })
        .collect()
}

/// Interpolate `${KEY}` and `$KEY` in command arguments against `env`.
///
/// With [`ArgExpansion::First`] only the first occurrence of each distinct
/// reference in an argument is replaced; [`ArgExpansion::All`] replaces all.
pub fn expand_args(args: &[String], env: &EnvMapping, mode: ArgExpansion) -> Vec<String> {
    args.iter()
        .map(|arg| {
            let mut seen: HashSet<String> = HashSet::new();
            REFERENCE
                .replace_all(arg, |caps: &Captures<'_>| {
                    let text = &caps[0];
                    let first = seen.insert(text.to_string());
                    if mode == ArgExpansion::First && !first {
                        return text.to_string();
                    }
                    expand_value(text, |name| env.get(name))
                })
                .into_owned()
        })
        .collect()
}
