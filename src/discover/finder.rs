//! Ancestor-directory search for env files.

use crate::domain::{EnvFile, FileSearchSpec};
use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Use `explicit` paths when given, otherwise search per `spec`.
pub fn resolve_env_files(spec: &FileSearchSpec, explicit: Option<&[PathBuf]>) -> Result<Vec<EnvFile>> {
    match explicit {
        Some(paths) if !paths.is_empty() => validate_file_paths(paths),
        _ => find_env_files(spec),
    }
}

/// Check every explicit path is an existing regular file, keeping the given order.
pub fn validate_file_paths(paths: &[PathBuf]) -> Result<Vec<EnvFile>> {
    paths
        .iter()
        .enumerate()
        .map(|(order, path)| {
            if !is_regular_file(path) {
                return Err(Error::NotAFile { path: path.clone() });
            }
            let path = path.canonicalize().unwrap_or_else(|_| path.clone());
            Ok(EnvFile { path, order, depth: 0 })
        })
        .collect()
}

/// Search `spec.start_dir` and then each ancestor for candidate files.
///
/// Within a directory, matches follow `spec.file_names` order. Ascent stops at
/// the filesystem root, or after the directory holding the root marker when
/// `limit_to_root` is set. With `ancestors` off, the first directory with any
/// match ends the search.
pub fn find_env_files(spec: &FileSearchSpec) -> Result<Vec<EnvFile>> {
    let start = spec
        .start_dir
        .canonicalize()
        .map_err(|source| Error::SearchPath { path: spec.start_dir.clone(), source })?;
    if !start.is_dir() {
        return Err(Error::SearchPath {
            path: spec.start_dir.clone(),
            source: io::Error::other("not a directory"),
        });
    }

    let mut found = Vec::new();
    let mut current = Some(start.as_path());
    let mut depth = 0;

    while let Some(dir) = current {
        let at_project_root = spec.limit_to_root && has_root_marker(dir, &spec.root_marker);

        let matched_before = found.len();
        for name in &spec.file_names {
            let candidate = dir.join(name);
            if is_regular_file(&candidate) {
                debug!("Found env file: {}", candidate.display());
                found.push(EnvFile { path: candidate, order: found.len(), depth });
            }
        }

        if !spec.ancestors && found.len() > matched_before {
            break;
        }
        if at_project_root {
            debug!("Reached project root marker in {}", dir.display());
            break;
        }

        current = dir.parent();
        depth += 1;
    }

    Ok(found)
}

fn has_root_marker(dir: &Path, marker: &str) -> bool {
    !marker.is_empty() && dir.join(marker).exists()
}

fn is_regular_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
