//! Configuration and environment handling for rulekit.
//!
//! This crate provides utilities for:
//! - Reading environment variables (`HOME`, `RULEKIT_CONFIG`, `RULEKIT_VERBOSE`).
//! - Loading the JSON-with-comments config file.
//! - Resolving each option from CLI flags, config keys and deprecated keys.

pub mod config;
pub mod env;
pub mod options;

pub use config::{
    config_path, load_config, parse_config, ConfigFile, StringList, DEFAULT_CONFIG_FILE,
};
pub use env::{config_path_from_env, env_verbose, home_dir};
pub use options::{
    resolve_options, CliOverrides, Deprecation, OptionResolver, OptionSource, ResolvedOptions,
};
