//! Error types for the env loading pipeline.
//!
//! Every variant is fatal to the invocation. Parse diagnostics carry the file
//! and line number but never the offending line, since env files hold secrets.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An explicit `--file-paths` entry is missing or not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile { path: PathBuf },

    #[error("Search path is not an accessible directory: {}", .path.display())]
    SearchPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read env file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse env file {} at line {line}: {reason}", .path.display())]
    Parse { path: PathBuf, line: usize, reason: String },

    #[error("Invalid override '{0}': expected KEY=VALUE")]
    InvalidOverride(String),

    #[error("No command supplied")]
    MissingCommand,

    #[error("Failed to run '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Exit status the invocation should terminate with for this error.
    ///
    /// Spawn failures follow the shell convention (127 not found, 126 not
    /// executable); everything else is a generic 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            _ => 1,
        }
    }
}
