//! Command-line interface for with-env
//!
//! A single command: options first, then the command to run and its
//! pass-through arguments.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod exec;
mod utils;

use crate::config::CliOverrides;
use crate::domain::AmbientPrecedence;
use crate::render::PrintFormat;
use utils::flag_pair;

/// Run a command with .env files loaded
#[derive(Parser, Debug)]
#[command(name = "with-env")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to run. The first value is split on spaces (quotes respected);
    /// any further values are passed through as-is.
    #[arg(value_name = "CMD", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Output extra debugging logs (on stderr)
    #[arg(short, long, alias = "verbose")]
    pub debug: bool,

    /// Environment name [default: $ENVIRONMENT, $ENV, $NODE_ENV or 'development']
    #[arg(short, long, value_name = "ENV")]
    pub env: Option<String>,

    /// Later files override earlier ones (default)
    #[arg(short = 'c', long, overrides_with = "no_cascade")]
    pub cascade: bool,

    /// Keep the first value seen for each variable
    #[arg(short = 'C', long)]
    pub no_cascade: bool,

    /// Name of the file marking the project root
    #[arg(short = 'r', long, value_name = "NAME")]
    pub root_file_name: Option<String>,

    /// Stop the ancestor search at the directory holding the root file (default)
    #[arg(short = 'l', long, overrides_with = "no_limit_to_project_root")]
    pub limit_to_project_root: bool,

    /// Ignore the root file and search every ancestor directory
    #[arg(short = 'L', long)]
    pub no_limit_to_project_root: bool,

    /// Directory to start searching for env files [default: current directory]
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Env file names to look for, in load order; '{env}' expands to the
    /// environment name (repeatable or comma-separated)
    #[arg(short = 'f', long, value_name = "NAMES", value_delimiter = ',')]
    pub file_names: Vec<String>,

    /// Load exactly these files instead of searching (repeatable or comma-separated)
    #[arg(short = 'F', long, value_name = "PATHS", value_delimiter = ',')]
    pub file_paths: Vec<PathBuf>,

    /// Search ancestor directories for env files (default)
    #[arg(short = 'a', long, overrides_with = "no_ancestor_dirs")]
    pub ancestor_dirs: bool,

    /// Stop at the first directory containing any env file
    #[arg(short = 'A', long)]
    pub no_ancestor_dirs: bool,

    /// Set a variable after files are loaded (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Start the command with only the loaded variables
    #[arg(short = 'i', long, overrides_with = "inherit_environment")]
    pub ignore_environment: bool,

    /// Start the command from this process's environment (default)
    #[arg(long)]
    pub inherit_environment: bool,

    /// Whether inherited variables lose (lowest) or win (highest) against loaded ones
    #[arg(long, value_enum, value_name = "PRECEDENCE")]
    pub ambient_precedence: Option<AmbientPrecedence>,

    /// Replace every ${VAR} occurrence in arguments, not just the first
    #[arg(long, overrides_with = "expand_first")]
    pub expand_all: bool,

    /// Replace only the first occurrence of each ${VAR} in an argument (default)
    #[arg(long)]
    pub expand_first: bool,

    /// Config file [default: with-env.toml or .with-env.{toml,yml,yaml} in the search path]
    #[arg(long, value_name = "FILE", env = "WITH_ENV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the loaded variables instead of running a command
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub print_env: Option<PrintFormat>,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    fn overrides(&self, search_path: PathBuf) -> CliOverrides {
        CliOverrides {
            env: self.env.clone(),
            search_path,
            file_names: self.file_names.clone(),
            file_paths: self.file_paths.clone(),
            cascade: flag_pair(self.cascade, self.no_cascade),
            ancestor_dirs: flag_pair(self.ancestor_dirs, self.no_ancestor_dirs),
            root_file_name: self.root_file_name.clone(),
            limit_to_project_root: flag_pair(
                self.limit_to_project_root,
                self.no_limit_to_project_root,
            ),
            ignore_environment: flag_pair(self.ignore_environment, self.inherit_environment),
            ambient_precedence: self.ambient_precedence,
            expand_all: flag_pair(self.expand_all, self.expand_first),
            overrides: self.set.clone(),
        }
    }
}

/// Parse arguments and run. Returns the exit code to terminate with.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --debug falls back to DEBUG.
    let filter = if cli.debug {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "with-env", &mut std::io::stdout());
        return Ok(0);
    }

    exec::run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_tokens_after_options() {
        let cli = Cli::parse_from(["with-env", "-e", "prod", "ls -la", "--color", "-1"]);
        assert_eq!(cli.env.as_deref(), Some("prod"));
        assert_eq!(cli.command, ["ls -la", "--color", "-1"]);
    }

    #[test]
    fn test_flag_pairs_last_one_wins() {
        let cli = Cli::parse_from(["with-env", "-C", "--cascade", "-A", "echo"]);
        let overrides = cli.overrides(PathBuf::from("."));
        assert_eq!(overrides.cascade, Some(true));
        assert_eq!(overrides.ancestor_dirs, Some(false));
        assert_eq!(overrides.limit_to_project_root, None);
    }

    #[test]
    fn test_repeatable_and_comma_separated_lists() {
        let cli = Cli::parse_from([
            "with-env", "-f", ".env,.env.{env}", "-f", ".env.extra", "-s", "A=1", "-s", "B=2",
            "echo",
        ]);
        assert_eq!(cli.file_names, [".env", ".env.{env}", ".env.extra"]);
        assert_eq!(cli.set, ["A=1", "B=2"]);
        assert_eq!(cli.command, ["echo"]);
    }

    #[test]
    fn test_no_command_is_accepted_by_parser() {
        let cli = Cli::parse_from(["with-env", "--print-env", "json"]);
        assert!(cli.command.is_empty());
        assert_eq!(cli.print_env, Some(PrintFormat::Json));
    }
}
