//! Child process execution
//!
//! The merged mapping is applied to the child only, never to this process's
//! own environment table.

pub mod environment;
pub mod runner;

pub use environment::compose_environment;
pub use runner::{exit_code, run_command};
