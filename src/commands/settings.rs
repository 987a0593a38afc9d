//! `config` group: inspect and edit the persisted configuration. None of these need
//! credentials, so they run without a command context.

use crate::config::{profile_key, CliConfig, ConfigLoader};
use crate::error::CliError;
use crate::profile::{mask_secret, Profile};
use crate::render::{OutputMode, RenderOptions, RenderRequest, Renderer, Resource, TypeTag};
use serde::Serialize;
use std::path::Path;

pub struct SettingsCommandService;

/// Resolved profile as shown by `config show`. Secrets are always masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileView {
    pub name: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub cloud_auth_token: Option<String>,
    pub client_id: Option<u64>,
    pub project_id: Option<u64>,
    pub region_id: Option<u64>,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            api_url: profile.api_url.clone(),
            api_key: profile.api_key.as_deref().map(mask_secret),
            cloud_auth_token: profile.cloud_auth_token.as_deref().map(mask_secret),
            client_id: profile.client_id,
            project_id: profile.project_id,
            region_id: profile.region_id,
        }
    }
}

impl Resource for ProfileView {
    const TAG: TypeTag = TypeTag::ProfileView;
}

/// One row of `config profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileName {
    pub name: String,
    pub active: bool,
    pub api_url: Option<String>,
}

impl Resource for ProfileName {
    const TAG: TypeTag = TypeTag::ProfileName;
}

impl SettingsCommandService {
    pub fn run_show(
        profile: &Profile,
        renderer: Renderer<'_>,
        mode: OutputMode,
    ) -> Result<String, CliError> {
        let view = ProfileView::from(profile);
        renderer.render(RenderRequest::one(&view, mode))
    }

    pub fn run_profiles(
        config: &CliConfig,
        renderer: Renderer<'_>,
        mode: OutputMode,
    ) -> Result<String, CliError> {
        let rows: Vec<ProfileName> = config
            .profiles
            .iter()
            .map(|(name, profile)| ProfileName {
                name: name.clone(),
                active: *name == config.active_profile,
                api_url: profile.api_url.clone(),
            })
            .collect();
        renderer.render(
            RenderRequest::many(&rows, mode).with_options(RenderOptions::resource("profiles")),
        )
    }

    /// Set one key in `profile` and write the file back.
    pub fn run_set(path: &Path, profile: &str, key: &str, value: &str) -> Result<String, CliError> {
        let mut config = ConfigLoader::load_for_edit(path)?;
        config.set_value(profile, key, value)?;
        ConfigLoader::save(path, &config)?;

        let normalized = key.replace('-', "_");
        let profile = profile_key(profile);
        if normalized == "active_profile" {
            Ok(format!("Active profile set to '{}'\n", config.active_profile))
        } else if value.is_empty() {
            Ok(format!("Cleared {} for profile '{}'\n", normalized, profile))
        } else {
            Ok(format!("Updated {} for profile '{}'\n", normalized, profile))
        }
    }
}
