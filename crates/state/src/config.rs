//! Configuration file support for rulekit.
//!
//! Settings are read from `rulekit.jsonc` in the working directory, or from
//! the path named by `RULEKIT_CONFIG` / `--config`. The file is JSON with
//! `//` and `/* */` comments:
//!
//! ```jsonc
//! {
//!   "$schema": "https://example.invalid/rulekit.schema.json",
//!   // Generate for every registered tool
//!   "targets": "*",
//!   "features": ["rules", "commands"],
//!   "baseDirs": ["."],
//!   "delete": true,
//!   "simulateCommands": true
//! }
//! ```
//!
//! Unknown keys are rejected. The `experimental*` keys are deprecated
//! synonyms; see [`crate::options`] for how they are merged.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rulekit.jsonc";

/// A list of identifiers, or a single string such as `"*"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    One(String),
    Many(Vec<String>),
}

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringList::One(s) => vec![s],
            StringList::Many(v) => v,
        }
    }
}

/// Raw contents of a config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "$schema")]
    pub schema: Option<String>,
    pub base_dirs: Option<Vec<String>>,
    pub targets: Option<StringList>,
    pub features: Option<StringList>,
    pub verbose: Option<bool>,
    pub delete: Option<bool>,
    pub global: Option<bool>,
    pub simulate_commands: Option<bool>,
    pub simulate_subagents: Option<bool>,
    pub simulate_skills: Option<bool>,
    /// Accepted for compatibility; MCP config sync is not performed.
    pub modular_mcp: Option<bool>,
    /// Deprecated: use `global`.
    pub experimental_global: Option<bool>,
    /// Deprecated: use `simulateCommands`.
    pub experimental_simulate_commands: Option<bool>,
    /// Deprecated: use `simulateSubagents`.
    pub experimental_simulate_subagents: Option<bool>,
}

/// Returns the config path: `explicit`, then `RULEKIT_CONFIG`, then
/// `rulekit.jsonc` under `cwd`.
pub fn config_path(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(crate::env::config_path_from_env)
        .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_FILE))
}

/// Parses config text, stripping comments first.
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let stripped = json_comments::StripComments::new(content.as_bytes());
    let config: ConfigFile =
        serde_json::from_reader(stripped).context("config does not match the schema")?;
    Ok(config)
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but fails to parse.
pub fn load_config(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        tracing::debug!(
            target: "rulekit::config",
            path = %path.display(),
            "No configuration file"
        );
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config =
        parse_config(&content).with_context(|| format!("invalid config {}", path.display()))?;

    if config.modular_mcp.is_some() {
        tracing::debug!(
            target: "rulekit::config",
            "modularMcp is accepted but MCP configuration is not synced"
        );
    }

    tracing::debug!(
        target: "rulekit::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}
