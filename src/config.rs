//! Configuration System
//!
//! Persisted CLI configuration: named credential profiles plus logging settings, loaded
//! from TOML through the `config` crate. Environment and flag layers are applied on top of
//! this by the profile resolver, not here.

use crate::error::CliError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod merge;
mod paths;
mod sources;

pub use merge::{DEFAULT_API_URL, DEFAULT_PROFILE_NAME};

/// Backward-compatible re-export of XDG path helpers
pub mod xdg {
    pub use super::paths::*;
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Profile used when neither --profile nor GCORE_PROFILE is set
    #[serde(default = "default_profile_name")]
    pub active_profile: String,

    /// API root shared by every profile that does not set its own
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Named credential profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "LoggingConfig::is_default")]
    pub logging: LoggingConfig,
}

/// One persisted profile. Every field is optional; resolution fills gaps from env and flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_auth_token: Option<String>,
}

fn default_profile_name() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            active_profile: default_profile_name(),
            api_url: default_api_url(),
            profiles: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Canonical form of a profile name.
///
/// The `config` crate lowercases table keys on load, so names are stored and looked up
/// lowercased everywhere else too.
pub fn profile_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl CliConfig {
    /// Profile by name, if persisted.
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(&profile_key(name))
    }

    /// Profile by name, created empty when absent.
    pub fn profile_mut(&mut self, name: &str) -> &mut ProfileConfig {
        self.profiles.entry(profile_key(name)).or_default()
    }

    /// Lowercase the active profile and every profile key.
    /// Keys that collide after lowercasing keep the last one in map order.
    pub fn normalized(mut self) -> Self {
        self.active_profile = profile_key(&self.active_profile);
        self.profiles = std::mem::take(&mut self.profiles)
            .into_iter()
            .map(|(name, profile)| (profile_key(&name), profile))
            .collect();
        self
    }

    /// Set one profile field from its textual form (`config set`).
    pub fn set_value(&mut self, profile: &str, key: &str, value: &str) -> Result<(), CliError> {
        let key = key.replace('-', "_");
        if key == "active_profile" {
            self.active_profile = profile_key(value);
            return Ok(());
        }

        let entry = self.profile_mut(profile);
        let text = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        match key.as_str() {
            "api_key" => entry.api_key = text,
            "api_url" => entry.api_url = text,
            "cloud_auth_token" => entry.cloud_auth_token = text,
            "client_id" | "client" => entry.client_id = parse_numeric(&key, text)?,
            "project_id" | "project" => entry.project_id = parse_numeric(&key, text)?,
            "region_id" | "region" => entry.region_id = parse_numeric(&key, text)?,
            _ => {
                return Err(CliError::Argument(format!(
                    "unknown config key '{}' (expected one of api-key, api-url, client-id, \
                     project-id, region-id, cloud-auth-token, active-profile)",
                    key
                )))
            }
        }
        Ok(())
    }
}

fn parse_numeric(key: &str, value: Option<String>) -> Result<Option<u64>, CliError> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map_err(|e| CliError::Argument(format!("parsing {}: {}", key, e)))
        })
        .transpose()
}

/// Loads the persisted configuration through the `config` crate source chain.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, then the global config file.
    /// An explicit path replaces the global file and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<CliConfig, CliError> {
        let builder = merge::builder_with_defaults()?;
        let builder = match explicit {
            Some(path) => sources::explicit_file::add_to_builder(builder, path)?,
            None => sources::global_file::add_to_builder(builder)?,
        };
        let config = builder.build()?;
        let loaded: CliConfig = config.try_deserialize()?;
        Ok(loaded.normalized())
    }

    /// Load a single file on top of defaults.
    pub fn load_from_file(path: &Path) -> Result<CliConfig, CliError> {
        Self::load(Some(path))
    }

    /// Path of the user-level config file, if HOME or XDG_CONFIG_HOME is set.
    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }

    /// Read the file that `config set` / `init` will rewrite, without merging defaults
    /// into other files.
    pub fn load_for_edit(path: &Path) -> Result<CliConfig, CliError> {
        if !path.exists() {
            return Ok(CliConfig::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let loaded: CliConfig = toml::from_str(&content).map_err(|e| {
            CliError::config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        Ok(loaded.normalized())
    }

    /// Write the configuration back as TOML, creating parent directories.
    pub fn save(path: &Path, config: &CliConfig) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let content = toml::to_string_pretty(config)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            CliError::config(format!("Failed to write config {}: {}", path.display(), e))
        })?;
        tracing::info!(config_path = %path.display(), "configuration saved");
        Ok(())
    }
}
