//! Configuration loading and merging
//!
//! Resolves run options from CLI flags, environment variables, an optional
//! config file and built-in defaults (CLI > Env > File > Defaults).

pub mod loader;
pub mod merge;

pub use loader::{load_config, FileConfig};
pub use merge::{merge_cli_with_config, CliOverrides, RunOptions};
