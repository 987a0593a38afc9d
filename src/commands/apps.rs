use crate::api::fastedge::{
    AppPatch, FastEdgeApi, APP_STATUS_DISABLED, APP_STATUS_DRAFT, APP_STATUS_ENABLED,
};
use crate::client::ApiFamily;
use crate::commands::{done_message, parse_env_pairs, parse_id};
use crate::context::CommandContext;
use crate::error::CliError;
use crate::render::{OutputMode, RenderOptions, RenderRequest};
use tracing::info;

pub struct AppCommandService;

/// Input of `fastedge apps create`.
#[derive(Debug, Clone, Default)]
pub struct CreateAppRequest {
    pub name: String,
    pub binary: String,
    pub plan: Option<String>,
    pub env: Vec<String>,
    pub comment: Option<String>,
    /// Create in draft state instead of enabled.
    pub draft: bool,
}

/// Input of `fastedge apps update`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAppRequest {
    pub name: Option<String>,
    pub binary: Option<String>,
    pub plan: Option<String>,
    pub env: Vec<String>,
    pub comment: Option<String>,
}

impl AppCommandService {
    pub fn run_list(ctx: &CommandContext<'_>) -> Result<String, CliError> {
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let apps = ctx.block_on("getting the list of apps", api.list_apps())?;
        ctx.render(
            RenderRequest::many(&apps.value, ctx.output_mode())
                .with_options(RenderOptions::resource("apps"))
                .with_raw_body(&apps.body),
        )
    }

    pub fn run_get(ctx: &CommandContext<'_>, id: &str) -> Result<String, CliError> {
        let id = parse_id(id, "app id")?;
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let app = ctx.block_on("getting app details", api.get_app(id))?;
        ctx.render(RenderRequest::one(&app.value, ctx.output_mode()).with_raw_body(&app.body))
    }

    pub fn run_create(
        ctx: &CommandContext<'_>,
        request: &CreateAppRequest,
    ) -> Result<String, CliError> {
        if request.name.trim().is_empty() {
            return Err(CliError::Argument("app name must not be empty".to_string()));
        }
        let patch = AppPatch {
            name: Some(request.name.clone()),
            binary: Some(parse_id(&request.binary, "binary id")?),
            plan: request.plan.clone(),
            status: Some(if request.draft {
                APP_STATUS_DRAFT
            } else {
                APP_STATUS_ENABLED
            }),
            env: if request.env.is_empty() {
                None
            } else {
                Some(parse_env_pairs(&request.env)?)
            },
            comment: request.comment.clone(),
        };

        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let app = ctx.block_on("creating app", api.create_app(&patch))?;
        info!(app = ?app.value.id, name = %request.name, "app created");
        ctx.render(RenderRequest::one(&app.value, ctx.output_mode()).with_raw_body(&app.body))
    }

    pub fn run_update(
        ctx: &CommandContext<'_>,
        id: &str,
        request: &UpdateAppRequest,
    ) -> Result<String, CliError> {
        let id = parse_id(id, "app id")?;
        let patch = AppPatch {
            name: request.name.clone(),
            binary: request
                .binary
                .as_deref()
                .map(|b| parse_id(b, "binary id"))
                .transpose()?,
            plan: request.plan.clone(),
            status: None,
            env: if request.env.is_empty() {
                None
            } else {
                Some(parse_env_pairs(&request.env)?)
            },
            comment: request.comment.clone(),
        };
        if patch.is_empty() {
            return Err(CliError::Argument(
                "nothing to update: pass at least one of --name, --binary, --plan, --env, --comment"
                    .to_string(),
            ));
        }
        Self::patch(ctx, id, &patch)
    }

    /// Enable or disable an app.
    pub fn run_set_enabled(
        ctx: &CommandContext<'_>,
        id: &str,
        enabled: bool,
    ) -> Result<String, CliError> {
        let id = parse_id(id, "app id")?;
        let patch = AppPatch {
            status: Some(if enabled {
                APP_STATUS_ENABLED
            } else {
                APP_STATUS_DISABLED
            }),
            ..Default::default()
        };
        Self::patch(ctx, id, &patch)
    }

    pub fn run_delete(ctx: &CommandContext<'_>, id: &str) -> Result<String, CliError> {
        let id = parse_id(id, "app id")?;
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let response = ctx.block_on("deleting app", api.delete_app(id))?;
        info!(app = id, "app deleted");
        Ok(done_message(
            &response.body,
            ctx.output_mode() == OutputMode::Raw,
            format!("App {} deleted\n", id),
        ))
    }

    fn patch(ctx: &CommandContext<'_>, id: i64, patch: &AppPatch) -> Result<String, CliError> {
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let app = ctx.block_on("updating app", api.update_app(id, patch))?;
        info!(app = id, "app updated");
        ctx.render(RenderRequest::one(&app.value, ctx.output_mode()).with_raw_body(&app.body))
    }
}
