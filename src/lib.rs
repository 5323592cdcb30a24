//! with-env: run a command with layered `.env` files loaded
//!
//! The pipeline is discover → load → expand → command → process: env files are
//! found by walking up from a starting directory, merged under a cascade
//! policy, interpolated, and handed to a child process as its environment.

pub mod cli;
pub mod command;
pub mod config;
pub mod discover;
pub mod domain;
pub mod error;
pub mod expand;
pub mod load;
pub mod process;
pub mod render;

pub use error::{Error, Result};
