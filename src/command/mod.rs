//! Command construction
//!
//! The first user token is split quote-aware into program and leading
//! arguments; any further tokens pass through verbatim.

pub mod tokenizer;

pub use tokenizer::Tokenizer;

use crate::domain::CommandSpec;
use crate::error::{Error, Result};

/// Build a [`CommandSpec`] from a raw command string and pass-through arguments.
pub fn build_command(raw: &str, passthrough: &[String]) -> Result<CommandSpec> {
    let mut tokens = Tokenizer::split(raw).into_iter();
    let program = tokens.next().filter(|p| !p.is_empty()).ok_or(Error::MissingCommand)?;
    let args = tokens.chain(passthrough.iter().cloned()).collect();
    Ok(CommandSpec { program, args })
}

/// Build from a token stream: the first token is split, the rest pass through.
pub fn build_from_tokens(tokens: &[String]) -> Result<CommandSpec> {
    match tokens.split_first() {
        Some((raw, rest)) => build_command(raw, rest),
        None => Err(Error::MissingCommand),
    }
}
