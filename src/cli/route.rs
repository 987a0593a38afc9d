//! CLI route: single route table and run context. Dispatches to command services.

use crate::cli::parse::{
    AppCommands, BinaryCommands, Commands, ConfigCommands, FastedgeCommands, GlobalArgs,
    NetworkCommands, NetworkTypeArg, PlanCommands, StatsArgs, StatsCommands,
};
use crate::cli::{command_family, command_name, format_init_summary};
use crate::api::cloud::NetworkType;
use crate::client::ApiFamily;
use crate::commands::{
    AppCommandService, BinaryCommandService, CreateAppRequest, CreateNetworkRequest,
    InitCommandService, InitRequest, NetworkCommandService, PlanCommandService,
    SettingsCommandService, StatsCommandService, StatsRequest, UpdateAppRequest,
};
use crate::config::{xdg, CliConfig, ConfigLoader, DEFAULT_PROFILE_NAME};
use crate::context::{CommandContext, ContextBuilder, GlobalOptions};
use crate::error::CliError;
use crate::profile::{EnvLayer, ProfileOverrides, ProfileResolver, ResolveContext};
use crate::render::{OutputMode, RenderRegistry, Renderer};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runtime context for CLI execution: the persisted config, the captured environment, the
/// flag overrides and the frozen render registry.
pub struct RunContext<'r> {
    config: CliConfig,
    config_path: Option<PathBuf>,
    env: EnvLayer,
    overrides: ProfileOverrides,
    options: GlobalOptions,
    registry: &'r RenderRegistry,
}

impl<'r> RunContext<'r> {
    /// Load configuration and environment for this process. Uses ConfigLoader only.
    ///
    /// A `--config` path that does not exist yet starts from defaults so `init` and
    /// `config set` can create it.
    pub fn new(global: &GlobalArgs, registry: &'r RenderRegistry) -> Result<Self, CliError> {
        let config = match global.config.as_deref() {
            Some(path) if !path.exists() => {
                debug!(config_path = %path.display(), "config file does not exist yet");
                CliConfig::default()
            }
            explicit => ConfigLoader::load(explicit)?,
        };
        let env = EnvLayer::from_env()?;
        Ok(Self::with_layers(
            config,
            global.config.clone(),
            env,
            overrides_from_args(global),
            options_from_args(global),
            registry,
        ))
    }

    /// Build from explicit layers (tests, embedding).
    pub fn with_layers(
        config: CliConfig,
        config_path: Option<PathBuf>,
        env: EnvLayer,
        overrides: ProfileOverrides,
        options: GlobalOptions,
        registry: &'r RenderRegistry,
    ) -> Self {
        Self {
            config,
            config_path,
            env,
            overrides: overrides.normalized(),
            options,
            registry,
        }
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    fn renderer(&self) -> Renderer<'r> {
        Renderer::new(self.registry)
    }

    fn resolve_context(&self) -> ResolveContext<'_> {
        ResolveContext {
            config: &self.config,
            env: &self.env,
            flags: &self.overrides,
        }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, CliError> {
        let name = command_name(command);
        let started = Instant::now();
        info!(command = %name, family = ?command_family(command), "command started");

        let result = self.execute_inner(command);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = %name, elapsed_ms, "command finished"),
            Err(e) => warn!(command = %name, stage = e.stage(), elapsed_ms, error = %e, "command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, CliError> {
        match command {
            Commands::Fastedge { command } => {
                let ctx = self.command_context(ApiFamily::FastEdge)?;
                self.handle_fastedge_command(&ctx, command)
            }
            Commands::Network { command } => {
                let ctx = self.command_context(ApiFamily::Cloud)?;
                self.handle_network_command(&ctx, command)
            }
            Commands::Config { command } => self.handle_config_command(command),
            Commands::Init {
                non_interactive,
                activate,
            } => self.handle_init(*non_interactive, *activate),
        }
    }

    /// Resolve the profile and build the group's client once, before any leaf runs.
    fn command_context(&self, family: ApiFamily) -> Result<CommandContext<'r>, CliError> {
        ContextBuilder::new(self.resolve_context(), self.options.clone())
            .build(&[family], self.renderer())
    }

    fn handle_fastedge_command(
        &self,
        ctx: &CommandContext<'_>,
        command: &FastedgeCommands,
    ) -> Result<String, CliError> {
        match command {
            FastedgeCommands::Apps { command } => match command {
                AppCommands::Ls => AppCommandService::run_list(ctx),
                AppCommands::Get { id } => AppCommandService::run_get(ctx, id),
                AppCommands::Create {
                    name,
                    binary,
                    plan,
                    env,
                    comment,
                    draft,
                } => AppCommandService::run_create(
                    ctx,
                    &CreateAppRequest {
                        name: name.clone(),
                        binary: binary.clone(),
                        plan: plan.clone(),
                        env: env.clone(),
                        comment: comment.clone(),
                        draft: *draft,
                    },
                ),
                AppCommands::Update {
                    id,
                    name,
                    binary,
                    plan,
                    env,
                    comment,
                } => AppCommandService::run_update(
                    ctx,
                    id,
                    &UpdateAppRequest {
                        name: name.clone(),
                        binary: binary.clone(),
                        plan: plan.clone(),
                        env: env.clone(),
                        comment: comment.clone(),
                    },
                ),
                AppCommands::Enable { id } => AppCommandService::run_set_enabled(ctx, id, true),
                AppCommands::Disable { id } => AppCommandService::run_set_enabled(ctx, id, false),
                AppCommands::Rm { id } => AppCommandService::run_delete(ctx, id),
            },
            FastedgeCommands::Binaries { command } => match command {
                BinaryCommands::Ls => BinaryCommandService::run_list(ctx),
                BinaryCommands::Get { id } => BinaryCommandService::run_get(ctx, id),
                BinaryCommands::Upload { file } => BinaryCommandService::run_upload(ctx, file),
                BinaryCommands::Rm { id } => BinaryCommandService::run_delete(ctx, id),
            },
            FastedgeCommands::Plans { command } => match command {
                PlanCommands::Ls => PlanCommandService::run_list(ctx),
                PlanCommands::Get { name } => PlanCommandService::run_get(ctx, name),
            },
            FastedgeCommands::Stats { command } => match command {
                StatsCommands::Calls(args) => {
                    StatsCommandService::run_calls(ctx, &stats_request(args))
                }
                StatsCommands::Duration(args) => {
                    StatsCommandService::run_duration(ctx, &stats_request(args))
                }
            },
        }
    }

    fn handle_network_command(
        &self,
        ctx: &CommandContext<'_>,
        command: &NetworkCommands,
    ) -> Result<String, CliError> {
        match command {
            NetworkCommands::Ls => NetworkCommandService::run_list(ctx),
            NetworkCommands::Show { id } => NetworkCommandService::run_show(ctx, id),
            NetworkCommands::Create {
                name,
                network_type,
                no_router,
            } => NetworkCommandService::run_create(
                ctx,
                &CreateNetworkRequest {
                    name: name.clone(),
                    network_type: match network_type {
                        NetworkTypeArg::Vxlan => NetworkType::Vxlan,
                        NetworkTypeArg::Vlan => NetworkType::Vlan,
                    },
                    create_router: !*no_router,
                },
            ),
            NetworkCommands::Rename { id, name } => {
                NetworkCommandService::run_rename(ctx, id, name)
            }
            NetworkCommands::Rm { id } => NetworkCommandService::run_delete(ctx, id),
        }
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, CliError> {
        match command {
            ConfigCommands::Show => {
                let profile = ProfileResolver::resolve_unchecked(&self.resolve_context())?;
                SettingsCommandService::run_show(&profile, self.renderer(), self.options.output)
            }
            ConfigCommands::Set { key, value } => {
                let path = self.edit_path()?;
                let profile = self
                    .overrides
                    .profile
                    .clone()
                    .unwrap_or_else(|| self.config.active_profile.clone());
                SettingsCommandService::run_set(&path, &profile, key, value)
            }
            ConfigCommands::Profiles => SettingsCommandService::run_profiles(
                &self.config,
                self.renderer(),
                self.options.output,
            ),
        }
    }

    /// File that `config set` and `init` rewrite.
    fn edit_path(&self) -> Result<PathBuf, CliError> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => xdg::default_config_file(),
        }
    }

    fn handle_init(&self, non_interactive: bool, activate: bool) -> Result<String, CliError> {
        let path = self.edit_path()?;
        let env = self.env.values();
        let mut request = InitRequest {
            profile: self
                .overrides
                .profile
                .clone()
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            api_key: self
                .overrides
                .api_key
                .clone()
                .or_else(|| env.api_key.clone())
                .unwrap_or_default(),
            cloud_auth_token: self
                .overrides
                .cloud_auth_token
                .clone()
                .or_else(|| env.cloud_auth_token.clone()),
            api_url: self.overrides.api_url.clone(),
            client_id: self.overrides.client_id.or(env.client_id),
            project_id: self.overrides.project_id.or(env.project_id),
            region_id: self.overrides.region_id.or(env.region_id),
            activate,
        };

        if !non_interactive && std::io::stdin().is_terminal() {
            prompt_init(&mut request)?;
        }

        let result = InitCommandService::run(&path, &request)?;
        Ok(format_init_summary(&result))
    }
}

fn prompt_init(request: &mut InitRequest) -> Result<(), CliError> {
    use dialoguer::{Confirm, Input, Password};

    let input_error = |e: dialoguer::Error| CliError::config(format!("Failed to get user input: {}", e));

    request.profile = Input::new()
        .with_prompt("Profile name")
        .default(request.profile.clone())
        .interact_text()
        .map_err(input_error)?;

    if request.api_key.is_empty() && request.cloud_auth_token.is_none() {
        request.api_key = Password::new()
            .with_prompt("API key")
            .interact()
            .map_err(input_error)?;
    }

    let api_url: String = Input::new()
        .with_prompt("API URL (empty for the default)")
        .allow_empty(true)
        .default(request.api_url.clone().unwrap_or_default())
        .show_default(request.api_url.is_some())
        .interact_text()
        .map_err(input_error)?;
    request.api_url = Some(api_url).filter(|u| !u.trim().is_empty());

    request.project_id = prompt_optional_id("Cloud project id", request.project_id)?;
    request.region_id = prompt_optional_id("Cloud region id", request.region_id)?;

    if !request.activate {
        request.activate = Confirm::new()
            .with_prompt(format!("Make '{}' the active profile?", request.profile))
            .default(true)
            .interact()
            .map_err(input_error)?;
    }
    Ok(())
}

fn prompt_optional_id(prompt: &str, current: Option<u64>) -> Result<Option<u64>, CliError> {
    use dialoguer::Input;

    let text: String = Input::new()
        .with_prompt(format!("{} (optional)", prompt))
        .allow_empty(true)
        .default(current.map(|v| v.to_string()).unwrap_or_default())
        .show_default(current.is_some())
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() || input.trim().parse::<u64>().is_ok() {
                Ok(())
            } else {
                Err("must be a number".to_string())
            }
        })
        .interact_text()
        .map_err(|e| CliError::config(format!("Failed to get user input: {}", e)))?;

    if text.trim().is_empty() {
        return Ok(None);
    }
    text.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| CliError::Argument(format!("parsing {}: {}", prompt, e)))
}

fn stats_request(args: &StatsArgs) -> StatsRequest {
    StatsRequest {
        app: args.app.clone(),
        from: args.from.clone(),
        to: args.to.clone(),
        step: args.step,
    }
}

/// Flag layer of profile resolution.
pub fn overrides_from_args(global: &GlobalArgs) -> ProfileOverrides {
    ProfileOverrides {
        profile: global.profile.clone(),
        api_key: global.api_key.clone(),
        api_url: global.api_url.clone(),
        client_id: global.client,
        project_id: global.project,
        region_id: global.region,
        cloud_auth_token: global.cloud_auth_token.clone(),
    }
    .normalized()
}

pub fn options_from_args(global: &GlobalArgs) -> GlobalOptions {
    GlobalOptions {
        output: OutputMode::from_raw_flag(global.output_raw),
        wait: global.wait,
        local: global.local,
        ..GlobalOptions::default()
    }
}
