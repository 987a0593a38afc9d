//! XDG base directory resolution.

use crate::error::CliError;
use std::path::PathBuf;

/// $XDG_CONFIG_HOME, falling back to $HOME/.config.
pub fn config_home() -> Result<PathBuf, CliError> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".config"))
        .map_err(|_| CliError::config("Neither XDG_CONFIG_HOME nor HOME is set"))
}

/// File that `init` and `config set` write to when --config is not given.
pub fn default_config_file() -> Result<PathBuf, CliError> {
    Ok(config_home()?.join("gcore-cli").join("config.toml"))
}
