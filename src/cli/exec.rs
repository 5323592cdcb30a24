//! Load env files and run the requested command.

use anyhow::{Context, Result};
use std::env;
use tracing::debug;

use super::Cli;
use crate::command::build_from_tokens;
use crate::config::{load_config, merge_cli_with_config};
use crate::discover::resolve_env_files;
use crate::domain::{CommandSpec, EnvMapping};
use crate::expand::{expand_args, expand_mapping};
use crate::load::{apply_overrides, load_env_files, merge_order};
use crate::process::{compose_environment, run_command};
use crate::render::render_mapping;

pub fn run(cli: Cli) -> Result<i32> {
    debug!("Running command: {:?}", cli.command);

    // Resolve the command before touching any file so a missing command
    // fails fast. Print mode needs no command.
    let command = match cli.print_env {
        Some(_) => None,
        None => Some(build_from_tokens(&cli.command)?),
    };

    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let search_path = match &cli.path {
        Some(path) => cwd.join(path),
        None => cwd.clone(),
    };
    debug!("CWD: {}", cwd.display());

    let config = load_config(&search_path, cli.config.as_deref())?;
    let options = merge_cli_with_config(cli.overrides(search_path), config, |key| {
        env::var(key).ok()
    })?;
    debug!(
        "Options: env={} cascade={} ancestors={} root_marker={} limit_to_root={} inherit={} \
         ambient={:?} args={:?}",
        options.env_name,
        options.cascade,
        options.search.ancestors,
        options.search.root_marker,
        options.search.limit_to_root,
        options.inherit_env,
        options.ambient_precedence,
        options.arg_expansion,
    );

    let files = resolve_env_files(&options.search, Some(options.file_paths.as_slice()))?;
    let ordered = merge_order(&files);
    if ordered.is_empty() {
        debug!("Loaded env files: none");
    }
    for file in &ordered {
        debug!("Loaded env file: {}", file.path.display());
    }

    let mut loaded = load_env_files(&ordered, options.cascade)?;
    apply_overrides(&mut loaded, &options.overrides);

    let ambient = EnvMapping::from_process();
    let fallback = if options.inherit_env { ambient.clone() } else { EnvMapping::new() };
    let expanded = expand_mapping(&loaded, &fallback);
    debug!("Env parsed: {}", expanded.keys().collect::<Vec<_>>().join(", "));

    let Some(command) = command else {
        if let Some(format) = cli.print_env {
            print!("{}", render_mapping(&expanded, format)?);
        }
        return Ok(0);
    };

    let child_env = compose_environment(
        &ambient,
        &expanded,
        options.inherit_env,
        options.ambient_precedence,
    );

    debug!("Command: {}", command.program);
    debug!("Args: {:?}", command.args);
    let args = expand_args(&command.args, &child_env, options.arg_expansion);
    debug!("Interpolated args: {} total", args.len());

    let command = CommandSpec { args, ..command };
    Ok(run_command(&command, &child_env, options.inherit_env)?)
}
