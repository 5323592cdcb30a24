//! Env file loading and merging
//!
//! Files are read one at a time, parsed, and folded into a single
//! [`LoadedEnv`] under the cascade policy. Expansion happens afterwards over
//! the whole mapping (see [`crate::expand`]).

pub mod merge;
pub mod overrides;
pub mod parser;

pub use merge::{merge_assignments, merge_order};
pub use overrides::{apply_overrides, parse_override, parse_overrides};

use crate::domain::{EnvFile, EnvMapping};
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use tracing::debug;

/// Merged file values plus the keys that must not be expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedEnv {
    pub mapping: EnvMapping,
    /// Keys whose current value came from a single-quoted assignment.
    pub literal: BTreeSet<String>,
}

impl LoadedEnv {
    pub(crate) fn set(&mut self, key: &str, value: &str, literal: bool) {
        self.mapping.insert(key, value);
        if literal {
            self.literal.insert(key.to_string());
        } else {
            self.literal.remove(key);
        }
    }
}

/// Read and merge `files` in the order given.
///
/// Any unreadable or malformed file aborts the whole load.
pub fn load_env_files(files: &[EnvFile], cascade: bool) -> Result<LoadedEnv> {
    let mut loaded = LoadedEnv::default();
    for file in files {
        let content = fs::read_to_string(&file.path)
            .map_err(|source| Error::Read { path: file.path.clone(), source })?;
        let assignments = parser::parse_str(&content).map_err(|e| Error::Parse {
            path: file.path.clone(),
            line: e.line,
            reason: e.reason.to_string(),
        })?;
        debug!("Parsed {} assignments from {}", assignments.len(), file.path.display());
        merge_assignments(&mut loaded, &assignments, cascade);
    }
    Ok(loaded)
}
