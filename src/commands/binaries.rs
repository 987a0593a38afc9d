use crate::api::fastedge::FastEdgeApi;
use crate::client::ApiFamily;
use crate::commands::{done_message, parse_id};
use crate::context::CommandContext;
use crate::error::CliError;
use crate::render::{OutputMode, RenderOptions, RenderRequest};
use std::path::Path;
use tracing::info;

pub struct BinaryCommandService;

impl BinaryCommandService {
    pub fn run_list(ctx: &CommandContext<'_>) -> Result<String, CliError> {
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let binaries = ctx.block_on("getting the list of binaries", api.list_binaries())?;
        ctx.render(
            RenderRequest::many(&binaries.value, ctx.output_mode())
                .with_options(RenderOptions::resource("binaries"))
                .with_raw_body(&binaries.body),
        )
    }

    pub fn run_get(ctx: &CommandContext<'_>, id: &str) -> Result<String, CliError> {
        let id = parse_id(id, "binary id")?;
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let binary = ctx.block_on("getting binary details", api.get_binary(id))?;
        ctx.render(RenderRequest::one(&binary.value, ctx.output_mode()).with_raw_body(&binary.body))
    }

    /// Upload a wasm file. The file is read whole; the API takes the raw module body.
    pub fn run_upload(ctx: &CommandContext<'_>, file: &Path) -> Result<String, CliError> {
        let wasm = std::fs::read(file).map_err(|e| {
            CliError::Argument(format!("reading {}: {}", file.display(), e))
        })?;
        if wasm.is_empty() {
            return Err(CliError::Argument(format!("{} is empty", file.display())));
        }
        let size = wasm.len();

        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let binary = ctx.block_on("uploading binary", api.upload_binary(wasm))?;
        info!(binary = binary.value.id, bytes = size, "binary uploaded");
        ctx.render(RenderRequest::one(&binary.value, ctx.output_mode()).with_raw_body(&binary.body))
    }

    pub fn run_delete(ctx: &CommandContext<'_>, id: &str) -> Result<String, CliError> {
        let id = parse_id(id, "binary id")?;
        let api = FastEdgeApi::new(ctx.client(ApiFamily::FastEdge)?);
        let response = ctx.block_on("deleting binary", api.delete_binary(id))?;
        info!(binary = id, "binary deleted");
        Ok(done_message(
            &response.body,
            ctx.output_mode() == OutputMode::Raw,
            format!("Binary {} deleted\n", id),
        ))
    }
}
