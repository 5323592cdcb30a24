//! Config file loading

use crate::domain::AmbientPrecedence;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_CANDIDATES: &[&str] =
    &["with-env.toml", ".with-env.toml", ".with-env.yml", ".with-env.yaml"];

/// Section name a config may nest its keys under.
const SECTION: &str = "with-env";

/// Defaults read from a config file. Every field is optional; CLI flags win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub env: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub file_names: Option<Vec<String>>,
    pub cascade: Option<bool>,
    pub ancestor_dirs: Option<bool>,
    pub root_file_name: Option<String>,
    pub limit_to_project_root: Option<bool>,
    pub ignore_environment: Option<bool>,
    pub ambient_precedence: Option<AmbientPrecedence>,
    pub expand_all: Option<bool>,
    /// Inline overrides, applied before `--set` ones.
    pub vars: BTreeMap<String, String>,
}

/// Accept `file_names = ".env, .env.local"` as well as a list.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        One(String),
        Many(Vec<String>),
    }

    let names = match Option::<Names>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Names::One(s)) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        Some(Names::Many(list)) => list,
    };
    let names: Vec<String> =
        names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()).map(str::to_string).collect();
    Ok(Some(names))
}

/// Load the config at `config_path`, or discover one in `search_dir`.
///
/// An explicit config that cannot be parsed is an error. A discovered one is
/// skipped with a warning so a stray file never blocks running a command.
pub fn load_config(search_dir: &Path, config_path: Option<&Path>) -> Result<FileConfig> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(FileConfig::default());
    };

    let parsed = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))
        .and_then(|content| parse_config(&content, &config_file));

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(FileConfig::default())
        }
    }
}

fn parse_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(content, config_file),
        "yaml" | "yml" => parse_yaml_config(content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

fn parse_toml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

fn parse_yaml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty YAML document is null.
    if raw.is_null() {
        return Ok(FileConfig::default());
    }

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|name| search_dir.join(name)).find(|path| path.is_file())
}
