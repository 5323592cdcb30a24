//! Merge CLI flags over config file values.

use super::loader::FileConfig;
use crate::domain::{
    default_file_names, AmbientPrecedence, ArgExpansion, EnvironmentName, FileSearchSpec,
    DEFAULT_ROOT_MARKER,
};
use crate::load::{parse_override, parse_overrides};
use anyhow::Result;
use std::path::PathBuf;

/// Values taken from the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub env: Option<String>,
    pub search_path: PathBuf,
    pub file_names: Vec<String>,
    pub file_paths: Vec<PathBuf>,
    pub cascade: Option<bool>,
    pub ancestor_dirs: Option<bool>,
    pub root_file_name: Option<String>,
    pub limit_to_project_root: Option<bool>,
    pub ignore_environment: Option<bool>,
    pub ambient_precedence: Option<AmbientPrecedence>,
    pub expand_all: Option<bool>,
    pub overrides: Vec<String>,
}

/// Fully resolved options for one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub env_name: EnvironmentName,
    pub search: FileSearchSpec,
    /// Explicit files replacing the directory search when non-empty.
    pub file_paths: Vec<PathBuf>,
    pub cascade: bool,
    /// Config `vars` first, then CLI `--set`, so the CLI wins.
    pub overrides: Vec<(String, String)>,
    pub inherit_env: bool,
    pub ambient_precedence: AmbientPrecedence,
    pub arg_expansion: ArgExpansion,
}

/// Resolve options. `lookup` reads environment variables for the
/// environment name.
pub fn merge_cli_with_config<F>(cli: CliOverrides, config: FileConfig, lookup: F) -> Result<RunOptions>
where
    F: Fn(&str) -> Option<String>,
{
    let env_name = EnvironmentName::resolve(cli.env.as_deref(), config.env.as_deref(), lookup);

    let templates = if !cli.file_names.is_empty() {
        cli.file_names
    } else {
        config.file_names.unwrap_or_default()
    };
    let file_names = if templates.is_empty() {
        default_file_names(&env_name)
    } else {
        templates.iter().map(|t| t.replace("{env}", env_name.as_str())).collect()
    };

    let search = FileSearchSpec::new(cli.search_path, file_names)
        .ancestors(cli.ancestor_dirs.or(config.ancestor_dirs).unwrap_or(true))
        .root_marker(
            cli.root_file_name
                .or(config.root_file_name)
                .unwrap_or_else(|| DEFAULT_ROOT_MARKER.to_string()),
        )
        .limit_to_root(cli.limit_to_project_root.or(config.limit_to_project_root).unwrap_or(true));

    let mut overrides = Vec::with_capacity(config.vars.len() + cli.overrides.len());
    for (key, value) in &config.vars {
        overrides.push(parse_override(&format!("{key}={value}"))?);
    }
    overrides.extend(parse_overrides(&cli.overrides)?);

    let expand_all = cli.expand_all.or(config.expand_all).unwrap_or(false);

    Ok(RunOptions {
        env_name,
        search,
        file_paths: cli.file_paths,
        cascade: cli.cascade.or(config.cascade).unwrap_or(true),
        overrides,
        inherit_env: !cli.ignore_environment.or(config.ignore_environment).unwrap_or(false),
        ambient_precedence: cli
            .ambient_precedence
            .or(config.ambient_precedence)
            .unwrap_or_default(),
        arg_expansion: if expand_all { ArgExpansion::All } else { ArgExpansion::First },
    })
}
