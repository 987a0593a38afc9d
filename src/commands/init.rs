//! `init`: create or update a credential profile in the persisted configuration.

use crate::config::{profile_key, ConfigLoader, ProfileConfig};
use crate::error::CliError;
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct InitCommandService;

/// Collected answers (from flags or prompts).
#[derive(Debug, Clone, Default)]
pub struct InitRequest {
    pub profile: String,
    pub api_key: String,
    pub cloud_auth_token: Option<String>,
    pub api_url: Option<String>,
    pub client_id: Option<u64>,
    pub project_id: Option<u64>,
    pub region_id: Option<u64>,
    /// Make this the active profile.
    pub activate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitResult {
    pub profile: String,
    pub config_path: PathBuf,
    /// False when an existing profile was overwritten.
    pub created: bool,
    pub active: bool,
}

impl InitCommandService {
    pub fn run(path: &Path, request: &InitRequest) -> Result<InitResult, CliError> {
        let name = profile_key(&request.profile);
        if name.is_empty() {
            return Err(CliError::Argument("profile name must not be empty".to_string()));
        }
        let api_key = Some(request.api_key.trim()).filter(|k| !k.is_empty());
        let cloud_auth_token = request
            .cloud_auth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if api_key.is_none() && cloud_auth_token.is_none() {
            return Err(CliError::missing_credential(
                "an API key or cloud auth token is required",
            ));
        }
        let api_url = request
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| {
                Url::parse(u)
                    .map(|_| u.trim_end_matches('/').to_string())
                    .map_err(|e| CliError::Argument(format!("parsing api url '{}': {}", u, e)))
            })
            .transpose()?;

        let mut config = ConfigLoader::load_for_edit(path)?;
        let created = !config.profiles.contains_key(&name);
        let active = request.activate || config.profiles.is_empty();
        config.profiles.insert(
            name.clone(),
            ProfileConfig {
                api_key: api_key.map(str::to_string),
                api_url,
                client_id: request.client_id,
                project_id: request.project_id,
                region_id: request.region_id,
                cloud_auth_token: cloud_auth_token.map(str::to_string),
            },
        );
        if active {
            config.active_profile = name.clone();
        }
        ConfigLoader::save(path, &config)?;
        info!(profile = %name, created, active, "profile initialized");

        Ok(InitResult {
            active: config.active_profile == name,
            profile: name,
            config_path: path.to_path_buf(),
            created,
        })
    }
}
