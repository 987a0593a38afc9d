//! Network presentation: curated network view and task renderers.

use crate::api::cloud::{NetworkSchema, Task, TaskList};
use crate::error::CliError;
use crate::render::generic;
use crate::render::{RenderOptions, RenderRegistry};
use serde::Serialize;

pub fn register(registry: &mut RenderRegistry) {
    registry.register_single::<NetworkSchema, _>(|network, _| {
        generic::format_value(&NetworkView::from(network))
    });
    registry.register_sequence::<NetworkSchema, _>(render_network_table);
    registry.register_single::<TaskList, _>(|tasks, _| Ok(format_task_list(tasks)));
    registry.register_single::<Task, _>(|task, _| generic::format_value(&TaskView::from(task)));
}

/// Fields shown for a network. Metadata and task bookkeeping are left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "Type")]
    pub network_type: &'a str,
    pub external: bool,
    pub default: bool,
    pub shared: bool,
    pub mtu: i64,
    pub subnets: &'a [String],
    pub segmentation_id: Option<i64>,
    pub project_id: i64,
    pub region: &'a str,
    pub region_id: i64,
    pub created_at: &'a str,
    pub updated_at: Option<&'a str>,
}

impl<'a> From<&'a NetworkSchema> for NetworkView<'a> {
    fn from(network: &'a NetworkSchema) -> Self {
        Self {
            id: &network.id,
            name: &network.name,
            network_type: &network.network_type,
            external: network.external,
            default: network.default,
            shared: network.shared,
            mtu: network.mtu,
            subnets: &network.subnets,
            segmentation_id: network.segmentation_id,
            project_id: network.project_id,
            region: &network.region,
            region_id: network.region_id,
            created_at: &network.created_at,
            updated_at: network.updated_at.as_deref(),
        }
    }
}

fn render_network_table(
    networks: &[NetworkSchema],
    _: &RenderOptions,
) -> Result<String, CliError> {
    let rows: Vec<NetworkView<'_>> = networks.iter().map(NetworkView::from).collect();
    generic::format_table(&rows)
}

fn format_task_list(tasks: &TaskList) -> String {
    if tasks.tasks.is_empty() {
        return "no tasks were started\n".to_string();
    }
    tasks
        .tasks
        .iter()
        .map(|id| format!("Task:\t{}\n", id))
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TaskView<'a> {
    id: &'a str,
    state: String,
    task_type: Option<&'a str>,
    created_on: Option<&'a str>,
    finished_on: Option<&'a str>,
    error: Option<&'a str>,
}

impl<'a> From<&'a Task> for TaskView<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            state: format!("{:?}", task.state).to_uppercase(),
            task_type: task.task_type.as_deref(),
            created_on: task.created_on.as_deref(),
            finished_on: task.finished_on.as_deref(),
            error: task.error.as_deref(),
        }
    }
}
