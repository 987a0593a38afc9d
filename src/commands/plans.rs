use crate::api::fastedge::FastEdgeApi;
use crate::client::ApiFamily;
use crate::context::CommandContext;
use crate::error::CliError;
use crate::render::{RenderOptions, RenderRequest};

pub struct PlanCommandService;

impl PlanCommandService {
    pub fn run_list(ctx: &CommandContext<'_>) -> Result<String, CliError> {
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let plans = ctx.block_on("getting the list of plans", api.list_plans())?;
        ctx.render(
            RenderRequest::many(&plans.value, ctx.output_mode())
                .with_options(RenderOptions::resource("plans"))
                .with_raw_body(&plans.body),
        )
    }

    pub fn run_get(ctx: &CommandContext<'_>, name: &str) -> Result<String, CliError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::Argument("plan name must not be empty".to_string()));
        }
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let plan = ctx.block_on("getting plan details", api.get_plan(name))?;
        ctx.render(RenderRequest::one(&plan.value, ctx.output_mode()).with_raw_body(&plan.body))
    }
}
