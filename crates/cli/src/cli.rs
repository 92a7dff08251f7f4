use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How reports are printed.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

/// Command-line interface for the `rulekit` application.
#[derive(Debug, Parser)]
#[command(
    name = "rulekit",
    version,
    about = "Keep AI coding tool rules, commands, subagents and skills in one place"
)]
pub struct Cli {
    /// Config file (default: $RULEKIT_CONFIG, then ./rulekit.jsonc).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Log at debug level (also `RULEKIT_VERBOSE=1`).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `rulekit` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generates tool files from `.rulekit/`.
    Generate(GenerateArgs),
    /// Imports one tool's files into `.rulekit/`.
    Import {
        /// Tool to import from, e.g. `claudecode`.
        #[arg(long, value_name = "TOOL")]
        target: String,
        /// Features to import (comma separated, `*` for all).
        #[arg(long, value_delimiter = ',', value_name = "FEATURES")]
        features: Option<Vec<String>>,
        /// Project directory receiving `.rulekit/`.
        #[arg(long = "base-dir", value_name = "DIR")]
        base_dir: Option<PathBuf>,
        /// Read from the tool's global (home directory) files.
        #[arg(long, default_value_t = false)]
        global: bool,
        /// Preview changes without writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Output format: text or json.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Lists the tools that support a feature.
    Targets {
        /// Feature to list; all features when omitted.
        #[arg(long, value_name = "FEATURE")]
        feature: Option<String>,
        /// List tools with a global layout.
        #[arg(long, default_value_t = false)]
        global: bool,
        /// Include tools that only receive simulated copies.
        #[arg(long, default_value_t = false)]
        include_simulated: bool,
    },
}

/// Arguments of `rulekit generate`. Unset flags fall through to the config file.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Tools to generate for (comma separated, `*` for all).
    #[arg(long, value_delimiter = ',', value_name = "TOOLS")]
    pub targets: Option<Vec<String>>,
    /// Features to generate (comma separated, `*` for all).
    #[arg(long, value_delimiter = ',', value_name = "FEATURES")]
    pub features: Option<Vec<String>>,
    /// Project directories holding `.rulekit/` (repeatable).
    #[arg(long = "base-dir", value_name = "DIR")]
    pub base_dirs: Vec<PathBuf>,
    /// Write to the tools' global (home directory) locations.
    #[arg(long, default_value_t = false)]
    pub global: bool,
    /// Remove stale generated files.
    #[arg(long, default_value_t = false)]
    pub delete: bool,
    /// Give tools without native commands a simulated copy.
    #[arg(long, default_value_t = false)]
    pub simulate_commands: bool,
    /// Give tools without native subagents a simulated copy.
    #[arg(long, default_value_t = false)]
    pub simulate_subagents: bool,
    /// Give tools without native skills a simulated copy.
    #[arg(long, default_value_t = false)]
    pub simulate_skills: bool,
    /// Preview changes without writing.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Output format: text or json.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}
