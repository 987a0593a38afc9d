//! Profile resolution
//!
//! Merges the persisted configuration, the process environment and command-line flags into
//! one immutable [`Profile`] per invocation. Precedence, field by field:
//! explicit flag > environment > persisted config > default.

use crate::config::{profile_key, CliConfig, ProfileConfig, DEFAULT_API_URL, DEFAULT_PROFILE_NAME};
use crate::error::CliError;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

pub const ENV_PROFILE: &str = "GCORE_PROFILE";
pub const ENV_API_KEY: &str = "GCORE_API_KEY";
pub const ENV_API_URL: &str = "GCORE_API_URL";
pub const ENV_CLIENT_ID: &str = "GCORE_CLIENT_ID";
pub const ENV_PROJECT_ID: &str = "GCORE_PROJECT_ID";
pub const ENV_REGION_ID: &str = "GCORE_REGION_ID";
pub const ENV_CLOUD_AUTH_TOKEN: &str = "GCORE_CLOUD_AUTH_TOKEN";

/// Resolved authentication/target configuration for one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub api_key: Option<String>,
    pub api_url: String,
    pub client_id: Option<u64>,
    pub project_id: Option<u64>,
    pub region_id: Option<u64>,
    pub cloud_auth_token: Option<String>,
}

impl Profile {
    /// True when at least one credential is present.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() || self.cloud_auth_token.is_some()
    }

    pub fn require_project(&self) -> Result<u64, CliError> {
        self.project_id.ok_or_else(|| CliError::Configuration {
            message: "subcommand requires a project id".to_string(),
            hint: Some(format!(
                "Pass --project, set {}, or run gcore-cli config set project-id <id>",
                ENV_PROJECT_ID
            )),
        })
    }

    pub fn require_region(&self) -> Result<u64, CliError> {
        self.region_id.ok_or_else(|| CliError::Configuration {
            message: "subcommand requires a region id".to_string(),
            hint: Some(format!(
                "Pass --region, set {}, or run gcore-cli config set region-id <id>",
                ENV_REGION_ID
            )),
        })
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("project_id", &self.project_id)
            .field("region_id", &self.region_id)
            .field(
                "cloud_auth_token",
                &self.cloud_auth_token.as_deref().map(mask_secret),
            )
            .finish()
    }
}

/// Keep the last four characters of a secret, mask the rest.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// One layer of profile fields; used for both flags and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverrides {
    pub profile: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub client_id: Option<u64>,
    pub project_id: Option<u64>,
    pub region_id: Option<u64>,
    pub cloud_auth_token: Option<String>,
}

impl ProfileOverrides {
    /// Drop empty strings so they cannot mask a lower layer; lowercase the profile name.
    pub fn normalized(self) -> Self {
        Self {
            profile: non_empty(self.profile).map(|name| profile_key(&name)),
            api_key: non_empty(self.api_key),
            api_url: non_empty(self.api_url),
            client_id: self.client_id,
            project_id: self.project_id,
            region_id: self.region_id,
            cloud_auth_token: non_empty(self.cloud_auth_token),
        }
    }
}

/// Environment layer, captured once so resolution itself never reads the process env.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvLayer(ProfileOverrides);

impl EnvLayer {
    /// Capture GCORE_* variables from the process environment.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit key/value pairs. Unrelated keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let text = |key: &str| non_empty(vars.get(key).cloned());
        let number = |key: &str| -> Result<Option<u64>, CliError> {
            text(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .map_err(|e| CliError::Argument(format!("parsing {}: {}", key, e)))
                })
                .transpose()
        };

        Ok(Self(ProfileOverrides {
            profile: text(ENV_PROFILE).map(|name| profile_key(&name)),
            api_key: text(ENV_API_KEY),
            api_url: text(ENV_API_URL),
            client_id: number(ENV_CLIENT_ID)?,
            project_id: number(ENV_PROJECT_ID)?,
            region_id: number(ENV_REGION_ID)?,
            cloud_auth_token: text(ENV_CLOUD_AUTH_TOKEN),
        }))
    }

    pub fn values(&self) -> &ProfileOverrides {
        &self.0
    }
}

/// Layer that supplied a resolved field; logged, never the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Flag,
    Environment,
    Config,
    Default,
}

/// Inputs to profile resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub config: &'a CliConfig,
    pub env: &'a EnvLayer,
    pub flags: &'a ProfileOverrides,
}

/// Applies the layer precedence to produce a [`Profile`].
pub struct ProfileResolver;

impl ProfileResolver {
    /// Resolve the active profile and require usable credentials.
    pub fn resolve(ctx: &ResolveContext<'_>) -> Result<Profile, CliError> {
        let profile = Self::resolve_unchecked(ctx)?;
        if !profile.has_credentials() {
            return Err(CliError::missing_credential(format!(
                "subcommand requires APIKEY token (profile '{}' has no api_key or cloud_auth_token)",
                profile.name
            )));
        }
        Ok(profile)
    }

    /// Resolve without the credential check (used by `config show`).
    pub fn resolve_unchecked(ctx: &ResolveContext<'_>) -> Result<Profile, CliError> {
        let flags = ctx.flags;
        let env = ctx.env.values();

        let (name, name_layer) = match (flags.profile.as_deref(), env.profile.as_deref()) {
            (Some(name), _) => (profile_key(name), Layer::Flag),
            (None, Some(name)) => (profile_key(name), Layer::Environment),
            (None, None) => (profile_key(&ctx.config.active_profile), Layer::Config),
        };

        // Only the implicit default profile may be absent from the file
        let empty = ProfileConfig::default();
        let persisted = match ctx.config.profile(&name) {
            Some(profile) => profile,
            None if name_layer == Layer::Config && name == DEFAULT_PROFILE_NAME => &empty,
            None => {
                return Err(CliError::Configuration {
                    message: format!("profile '{}' not found in configuration", name),
                    hint: Some("See gcore-cli config profiles".to_string()),
                })
            }
        };
        debug!(profile = %name, source = ?name_layer, "selected profile");

        let api_key = pick(
            "api_key",
            flags.api_key.clone(),
            env.api_key.clone(),
            non_empty(persisted.api_key.clone()),
        );
        let cloud_auth_token = pick(
            "cloud_auth_token",
            flags.cloud_auth_token.clone(),
            env.cloud_auth_token.clone(),
            non_empty(persisted.cloud_auth_token.clone()),
        );
        let client_id = pick("client_id", flags.client_id, env.client_id, persisted.client_id);
        let project_id = pick(
            "project_id",
            flags.project_id,
            env.project_id,
            persisted.project_id,
        );
        let region_id = pick("region_id", flags.region_id, env.region_id, persisted.region_id);
        let api_url = pick(
            "api_url",
            flags.api_url.clone(),
            env.api_url.clone(),
            non_empty(persisted.api_url.clone()).or_else(|| non_empty(Some(ctx.config.api_url.clone()))),
        )
        .unwrap_or_else(|| {
            debug!(field = "api_url", source = ?Layer::Default, "resolved profile field");
            DEFAULT_API_URL.to_string()
        });

        Ok(Profile {
            name,
            api_key,
            api_url,
            client_id,
            project_id,
            region_id,
            cloud_auth_token,
        })
    }
}

fn pick<T>(field: &'static str, flag: Option<T>, env: Option<T>, config: Option<T>) -> Option<T> {
    let (value, layer) = if let Some(v) = flag {
        (Some(v), Layer::Flag)
    } else if let Some(v) = env {
        (Some(v), Layer::Environment)
    } else if let Some(v) = config {
        (Some(v), Layer::Config)
    } else {
        (None, Layer::Default)
    };
    debug!(field, source = ?layer, present = value.is_some(), "resolved profile field");
    value
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
