//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// API root used when no layer names one.
pub const DEFAULT_API_URL: &str = "https://api.gcore.com";

/// Profile name used when no layer names one.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Create a Config builder with merge policy defaults applied.
/// Later sources override earlier ones key by key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("active_profile", DEFAULT_PROFILE_NAME)?
        .set_default("api_url", DEFAULT_API_URL)
}
