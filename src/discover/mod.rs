//! Env file discovery
//!
//! Walks from a starting directory towards the filesystem root, collecting
//! candidate env files, or validates an explicit list of file paths.

pub mod finder;

pub use finder::{find_env_files, resolve_env_files, validate_file_paths};
