use crate::api::fastedge::{FastEdgeApi, StatsQuery};
use crate::client::ApiFamily;
use crate::commands::parse_id;
use crate::context::CommandContext;
use crate::error::CliError;
use crate::render::{RenderOptions, RenderRequest};
use chrono::{DateTime, SecondsFormat, Utc};

/// Default bucket size: one hour.
pub const DEFAULT_STEP_SECS: u64 = 3600;

pub struct StatsCommandService;

/// Input of `fastedge stats calls|duration`.
#[derive(Debug, Clone)]
pub struct StatsRequest {
    pub app: Option<String>,
    pub from: String,
    /// Defaults to now.
    pub to: Option<String>,
    pub step: u64,
}

impl StatsRequest {
    /// Validate the window and build the API query.
    pub fn to_query(&self, now: DateTime<Utc>) -> Result<StatsQuery, CliError> {
        let from = parse_time("--from", &self.from)?;
        let to = match &self.to {
            Some(to) => parse_time("--to", to)?,
            None => now,
        };
        if from >= to {
            return Err(CliError::Argument(format!(
                "--from ({}) must be earlier than --to ({})",
                from.to_rfc3339_opts(SecondsFormat::Secs, true),
                to.to_rfc3339_opts(SecondsFormat::Secs, true)
            )));
        }
        if self.step == 0 {
            return Err(CliError::Argument("--step must be positive".to_string()));
        }
        Ok(StatsQuery {
            from: from.to_rfc3339_opts(SecondsFormat::Secs, true),
            to: to.to_rfc3339_opts(SecondsFormat::Secs, true),
            step: self.step,
            id: self
                .app
                .as_deref()
                .map(|app| parse_id(app, "app id"))
                .transpose()?,
        })
    }
}

fn parse_time(flag: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Argument(format!("parsing {} '{}': {}", flag, value, e)))
}

impl StatsCommandService {
    pub fn run_calls(ctx: &CommandContext<'_>, request: &StatsRequest) -> Result<String, CliError> {
        let query = request.to_query(Utc::now())?;
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let stats = ctx.block_on("getting call statistics", api.call_stats(&query))?;
        ctx.render(
            RenderRequest::many(&stats.value, ctx.output_mode())
                .with_options(RenderOptions::resource("call statistics for this period"))
                .with_raw_body(&stats.body),
        )
    }

    pub fn run_duration(
        ctx: &CommandContext<'_>,
        request: &StatsRequest,
    ) -> Result<String, CliError> {
        let query = request.to_query(Utc::now())?;
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let stats = ctx.block_on("getting duration statistics", api.duration_stats(&query))?;
        ctx.render(
            RenderRequest::many(&stats.value, ctx.output_mode())
                .with_options(RenderOptions::resource("duration statistics for this period"))
                .with_raw_body(&stats.body),
        )
    }
}
