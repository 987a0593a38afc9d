//! FastEdge presentation: app, binary and plan renderers.

use crate::api::fastedge::{
    app_status_name, App, AppSummary, Binary, BinarySummary, Plan, PlanName,
};
use crate::error::CliError;
use crate::render::generic::{self, NULL_PLACEHOLDER};
use crate::render::{RenderOptions, RenderRegistry};
use serde::Serialize;

pub fn register(registry: &mut RenderRegistry) {
    registry.register_single::<App, _>(|app, _| Ok(format_app(app)));
    registry.register_sequence::<AppSummary, _>(|apps, _| Ok(format_app_list(apps)));
    registry.register_single::<AppSummary, _>(|app, _| Ok(format_app_list(std::slice::from_ref(app))));

    registry.register_single::<Binary, _>(|binary, _| generic::format_value(&BinaryView::from(binary)));
    registry.register_single::<BinarySummary, _>(|binary, _| {
        generic::format_value(&BinaryView::from(binary))
    });
    registry.register_sequence::<BinarySummary, _>(render_binary_table);

    registry.register_sequence::<PlanName, _>(|plans, _| {
        Ok(plans.iter().map(|p| format!("{}\n", p.0)).collect())
    });
    registry.register_single::<Plan, _>(|plan, _| generic::format_value(&PlanView::from(plan)));
}

pub fn format_app_list(apps: &[AppSummary]) -> String {
    apps.iter()
        .map(|app| {
            format!(
                "ID: {}\n\tStatus:\t{}\n\tName:\t{}\n\tUrl:\t{}\n",
                app.id,
                app_status_name(app.status),
                app.name,
                app.url.as_deref().unwrap_or(NULL_PLACEHOLDER)
            )
        })
        .collect()
}

pub fn format_app(app: &App) -> String {
    let mut output = format!(
        "Name:\t{}\nBinary:\t{}\nPlan:\t{}\nStatus:\t{}\nUrl:\t{}\n",
        app.name.as_deref().unwrap_or(NULL_PLACEHOLDER),
        app.binary,
        app.plan.as_deref().unwrap_or(NULL_PLACEHOLDER),
        app_status_name(app.status),
        app.url.as_deref().unwrap_or(NULL_PLACEHOLDER),
    );
    if !app.env.is_empty() {
        output.push_str("Env:\n");
        for (key, value) in &app.env {
            output.push_str(&format!("\t{}={}\n", key, value));
        }
    }
    if let Some(comment) = app.comment.as_deref().filter(|c| !c.is_empty()) {
        output.push_str(&format!("Comment:\t{}\n", comment));
    }
    output
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BinaryView<'a> {
    id: i64,
    status: i64,
    api_type: Option<&'a str>,
    checksum: Option<&'a str>,
    unref_since: Option<&'a str>,
}

impl<'a> From<&'a Binary> for BinaryView<'a> {
    fn from(binary: &'a Binary) -> Self {
        Self {
            id: binary.id,
            status: binary.status,
            api_type: binary.api_type.as_deref(),
            checksum: binary.checksum.as_deref(),
            unref_since: binary.unref_since.as_deref(),
        }
    }
}

impl<'a> From<&'a BinarySummary> for BinaryView<'a> {
    fn from(binary: &'a BinarySummary) -> Self {
        Self {
            id: binary.id,
            status: binary.status,
            api_type: binary.api_type.as_deref(),
            checksum: None,
            unref_since: binary.unref_since.as_deref(),
        }
    }
}

fn render_binary_table(binaries: &[BinarySummary], _: &RenderOptions) -> Result<String, CliError> {
    let rows: Vec<BinaryView<'_>> = binaries.iter().map(BinaryView::from).collect();
    generic::format_table(&rows)
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PlanView {
    max_duration: Option<String>,
    mem_limit: Option<String>,
    max_subrequests: Option<u64>,
}

impl From<&Plan> for PlanView {
    fn from(plan: &Plan) -> Self {
        Self {
            max_duration: plan.max_duration.map(|ms| format!("{} ms", ms)),
            mem_limit: plan.mem_limit.map(|bytes| format!("{} MB", bytes / (1024 * 1024))),
            max_subrequests: plan.max_subrequests,
        }
    }
}
