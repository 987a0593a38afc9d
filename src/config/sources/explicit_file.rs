//! Explicit config file source: the file named by --config.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use config::FileFormat;
use std::path::Path;
use tracing::debug;

/// Add the --config file to builder.
/// The file replaces the global one rather than layering over it, so it must exist.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    config_path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path.display().to_string()));
    }

    let canonical_path = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    debug!(config_path = %canonical_path.display(), "Using explicit configuration file");

    let builder = builder.add_source(
        File::from(canonical_path)
            .format(FileFormat::Toml)
            .required(true),
    );

    Ok(builder)
}
