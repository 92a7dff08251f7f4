use anyhow::Result;
use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "RULEKIT_CONFIG";
/// Environment variable enabling debug logging.
pub const VERBOSE_ENV: &str = "RULEKIT_VERBOSE";

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

/// Returns the config path set through `RULEKIT_CONFIG`, if any.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Checks if `RULEKIT_VERBOSE` is set to a truthy value.
///
/// Returns `None` when the variable is unset so callers can fall through to
/// the config file.
pub fn env_verbose() -> Option<bool> {
    std::env::var(VERBOSE_ENV).ok().map(|s| is_truthy(&s))
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}
