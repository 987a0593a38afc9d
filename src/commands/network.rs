use crate::api::cloud::{CloudApi, CreateNetwork, NetworkType, PollPolicy, TaskList};
use crate::client::ApiFamily;
use crate::commands::done_message;
use crate::context::CommandContext;
use crate::error::CliError;
use crate::render::{OutputMode, RenderOptions, RenderRequest};
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

pub struct NetworkCommandService;

/// Input of `network create`.
#[derive(Debug, Clone)]
pub struct CreateNetworkRequest {
    pub name: String,
    pub network_type: NetworkType,
    pub create_router: bool,
}

// Letters, digits, spaces, dots, underscores and dashes; 3 to 63 characters, starting with a
// letter or digit and not ending with a space or dash
static NETWORK_NAME_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z 0-9._\-]{1,61}[a-zA-Z0-9._]$"));

/// Check a network name against the cloud naming rules before any request is sent.
pub fn validate_network_name(name: &str) -> Result<(), CliError> {
    let regex = NETWORK_NAME_REGEX
        .as_ref()
        .map_err(|e| CliError::Argument(format!("network name pattern: {}", e)))?;
    if !regex.is_match(name) {
        return Err(CliError::Argument(format!(
            "invalid network name '{}': use 3-63 letters, digits, spaces, '.', '_' or '-', \
             starting with a letter or digit",
            name
        )));
    }
    Ok(())
}

impl NetworkCommandService {
    fn api<'c>(ctx: &'c CommandContext<'_>) -> Result<CloudApi<'c>, CliError> {
        let profile = ctx.profile();
        let project = profile.require_project()?;
        let region = profile.require_region()?;
        Ok(CloudApi::new(ctx.client(ApiFamily::Cloud)?, project, region))
    }

    fn poll_policy(ctx: &CommandContext<'_>) -> PollPolicy {
        PollPolicy {
            interval: ctx.options().task_poll_interval,
            timeout: ctx.options().task_timeout,
        }
    }

    pub fn run_list(ctx: &CommandContext<'_>) -> Result<String, CliError> {
        let api = Self::api(ctx)?;
        let networks = ctx.block_on("getting the list of networks", api.list_networks())?;
        ctx.render(
            RenderRequest::many(&networks.value, ctx.output_mode())
                .with_options(RenderOptions::resource("networks"))
                .with_raw_body(&networks.body),
        )
    }

    pub fn run_show(ctx: &CommandContext<'_>, id: &str) -> Result<String, CliError> {
        let api = Self::api(ctx)?;
        let network = ctx.block_on("getting network details", api.get_network(id))?;
        ctx.render(
            RenderRequest::one(&network.value, ctx.output_mode()).with_raw_body(&network.body),
        )
    }

    /// Create a network. With `--wait`, block until the creation task finishes and show the
    /// new network; otherwise show the task ids.
    pub fn run_create(
        ctx: &CommandContext<'_>,
        request: &CreateNetworkRequest,
    ) -> Result<String, CliError> {
        validate_network_name(&request.name)?;
        let api = Self::api(ctx)?;
        let body = CreateNetwork {
            name: request.name.clone(),
            network_type: request.network_type,
            create_router: request.create_router,
        };
        let tasks = ctx.block_on("creating network", api.create_network(&body))?;
        info!(name = %request.name, tasks = ?tasks.value.tasks, "network creation requested");

        if !ctx.wait() {
            return ctx.render(
                RenderRequest::one(&tasks.value, ctx.output_mode()).with_raw_body(&tasks.body),
            );
        }

        let policy = Self::poll_policy(ctx);
        let task_id = first_task(&tasks.value, "creating network")?;
        let task = ctx.block_on("waiting for network creation", api.wait_for_task(task_id, policy))?;
        let created = task
            .value
            .created_resources
            .as_ref()
            .and_then(|r| r.get("networks"))
            .and_then(|n| n.get(0))
            .and_then(|id| id.as_str())
            .map(str::to_string);

        match created {
            Some(network_id) => {
                let network =
                    ctx.block_on("getting network details", api.get_network(&network_id))?;
                ctx.render(
                    RenderRequest::one(&network.value, ctx.output_mode())
                        .with_raw_body(&network.body),
                )
            }
            None => ctx.render(
                RenderRequest::one(&task.value, ctx.output_mode()).with_raw_body(&task.body),
            ),
        }
    }

    pub fn run_rename(ctx: &CommandContext<'_>, id: &str, name: &str) -> Result<String, CliError> {
        validate_network_name(name)?;
        let api = Self::api(ctx)?;
        let network = ctx.block_on("renaming network", api.rename_network(id, name))?;
        info!(network = %id, name = %name, "network renamed");
        ctx.render(
            RenderRequest::one(&network.value, ctx.output_mode()).with_raw_body(&network.body),
        )
    }

    pub fn run_delete(ctx: &CommandContext<'_>, id: &str) -> Result<String, CliError> {
        let api = Self::api(ctx)?;
        let tasks = ctx.block_on("deleting network", api.delete_network(id))?;
        info!(network = %id, tasks = ?tasks.value.tasks, "network deletion requested");

        if !ctx.wait() {
            return ctx.render(
                RenderRequest::one(&tasks.value, ctx.output_mode()).with_raw_body(&tasks.body),
            );
        }

        let policy = Self::poll_policy(ctx);
        let task_id = first_task(&tasks.value, "deleting network")?;
        let task = ctx.block_on("waiting for network deletion", api.wait_for_task(task_id, policy))?;
        Ok(done_message(
            &task.body,
            ctx.output_mode() == OutputMode::Raw,
            format!("Network {} deleted\n", id),
        ))
    }
}

fn first_task<'t>(tasks: &'t TaskList, context: &str) -> Result<&'t str, CliError> {
    tasks
        .tasks
        .first()
        .map(String::as_str)
        .ok_or_else(|| CliError::Request {
            context: context.to_string(),
            status: 200,
            body: "response carried no task id".to_string(),
        })
}
