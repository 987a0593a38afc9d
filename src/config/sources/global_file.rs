//! Global config file source: ~/.config/gcore-cli/config.toml or $XDG_CONFIG_HOME/gcore-cli/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use config::FileFormat;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    super::super::paths::config_home()
        .ok()
        .map(|home| home.join("gcore-cli").join("config.toml"))
}

/// Add global config file source to builder if it exists.
/// Uses XDG_CONFIG_HOME when set, otherwise ~/.config/gcore-cli/config.toml.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let canonical_path = global_path
                .canonicalize()
                .unwrap_or_else(|_| global_path.clone());
            builder = builder.add_source(
                File::from(canonical_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        } else {
            debug!(
                config_path = %global_path.display(),
                "No configuration file found; run `gcore-cli init` to create one"
            );
        }
    }
    Ok(builder)
}
