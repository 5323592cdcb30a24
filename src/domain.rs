//! Core data types shared across the pipeline.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_ROOT_MARKER: &str = ".root";

/// Variables consulted, in order, for the environment name when `--env` is absent.
pub const ENVIRONMENT_VARS: &[&str] = &["ENVIRONMENT", "ENV", "NODE_ENV"];

/// Name of the active deployment environment, e.g. `development`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve the name from an explicit choice, then [`ENVIRONMENT_VARS`]
    /// through `lookup`, then `fallback`, then [`DEFAULT_ENVIRONMENT`].
    /// Empty values are treated as unset.
    pub fn resolve<F>(explicit: Option<&str>, fallback: Option<&str>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = explicit.filter(|n| !n.is_empty()) {
            return Self::new(name);
        }
        for var in ENVIRONMENT_VARS {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                return Self(value);
            }
        }
        Self::new(fallback.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_ENVIRONMENT))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate file names in load order for `env`.
pub fn default_file_names(env: &EnvironmentName) -> Vec<String> {
    vec![
        ".env".to_string(),
        format!(".env.{env}"),
        ".env.local".to_string(),
        format!(".env.{env}.local"),
    ]
}

/// How env files are discovered for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSearchSpec {
    pub start_dir: PathBuf,
    pub file_names: Vec<String>,
    /// Keep ascending after the first directory that yields a match.
    pub ancestors: bool,
    pub root_marker: String,
    /// Stop ascending at the directory holding `root_marker`.
    pub limit_to_root: bool,
}

impl FileSearchSpec {
    pub fn new(start_dir: PathBuf, file_names: Vec<String>) -> Self {
        Self {
            start_dir,
            file_names,
            ancestors: true,
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            limit_to_root: true,
        }
    }

    pub fn ancestors(mut self, ancestors: bool) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn root_marker(mut self, marker: impl Into<String>) -> Self {
        self.root_marker = marker.into();
        self
    }

    pub fn limit_to_root(mut self, limit: bool) -> Self {
        self.limit_to_root = limit;
        self
    }
}

/// A discovered env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    /// Position in discovery order.
    pub order: usize,
    /// Directory distance from the starting directory (0 = start dir).
    pub depth: usize,
}

/// Insertion-ordered map of variable names to values, keys unique.
#[derive(Debug, Clone, Default)]
pub struct EnvMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl EnvMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the invoking process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Set `key`, keeping its original position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Set `key` only if absent. Returns whether the value was written.
    pub fn insert_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.insert(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for EnvMapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for EnvMapping {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = EnvMapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

/// Executable plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// Where the inherited process environment sits relative to loaded values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AmbientPrecedence {
    /// Loaded values overwrite inherited ones.
    #[default]
    Lowest,
    /// Inherited values win over loaded ones.
    Highest,
}

/// Substitution policy for references inside command arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgExpansion {
    /// Only the first occurrence of each reference form per key.
    #[default]
    First,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_environment_name_defaults_to_development() {
        let env = EnvironmentName::resolve(None, None, lookup_from(&[]));
        assert_eq!(env.as_str(), "development");
    }

    #[test]
    fn test_environment_name_source_priority() {
        let lookup = lookup_from(&[("NODE_ENV", "test"), ("ENV", "staging")]);
        assert_eq!(EnvironmentName::resolve(None, None, &lookup).as_str(), "staging");
        assert_eq!(EnvironmentName::resolve(Some("prod"), None, &lookup).as_str(), "prod");
    }

    #[test]
    fn test_environment_name_skips_empty_values() {
        let lookup = lookup_from(&[("ENVIRONMENT", ""), ("NODE_ENV", "test")]);
        assert_eq!(EnvironmentName::resolve(Some(""), None, lookup).as_str(), "test");
    }

    #[test]
    fn test_environment_name_fallback_below_variables() {
        let env = EnvironmentName::resolve(None, Some("qa"), lookup_from(&[]));
        assert_eq!(env.as_str(), "qa");
        let env = EnvironmentName::resolve(None, Some("qa"), lookup_from(&[("ENV", "ci")]));
        assert_eq!(env.as_str(), "ci");
    }

    #[test]
    fn test_default_file_names_order() {
        let names = default_file_names(&EnvironmentName::new("production"));
        assert_eq!(names, [".env", ".env.production", ".env.local", ".env.production.local"]);
    }

    #[test]
    fn test_mapping_keeps_insertion_order_on_overwrite() {
        let mut m = EnvMapping::new();
        m.insert("B", "1");
        m.insert("A", "2");
        assert_eq!(m.insert("B", "3"), Some("1".to_string()));
        assert!(!m.insert_if_absent("A", "9"));
        let pairs: Vec<_> = m.iter().collect();
        assert_eq!(pairs, [("B", "3"), ("A", "2")]);
    }
}
