//! Cloud endpoints: networks and the task queue behind asynchronous operations.

use crate::client::{ApiFamily, ClientHandle, Decoded};
use crate::error::CliError;
use crate::render::{Resource, TypeTag};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Network as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSchema {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub network_type: String,
    #[serde(default)]
    pub external: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub mtu: i64,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<MetadataItem>,
    #[serde(default)]
    pub segmentation_id: Option<i64>,
    #[serde(default)]
    pub project_id: i64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub region_id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub creator_task_id: Option<String>,
}

impl Resource for NetworkSchema {
    const TAG: TypeTag = TypeTag::Network;
}

#[derive(Debug, Clone, Deserialize)]
struct NetworkList {
    #[serde(default)]
    results: Vec<NetworkSchema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Vxlan,
    Vlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNetwork {
    pub name: String,
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    pub create_router: bool,
}

/// Task ids returned by asynchronous operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl Resource for TaskList {
    const TAG: TypeTag = TypeTag::TaskList;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    New,
    Running,
    Finished,
    Error,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Finished | TaskState::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub state: TaskState,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub finished_on: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_resources: Option<serde_json::Value>,
}

impl Resource for Task {
    const TAG: TypeTag = TypeTag::Task;
}

/// How `wait_for_task` polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

/// Cloud endpoint set scoped to one project and region.
#[derive(Debug, Clone, Copy)]
pub struct CloudApi<'c> {
    client: &'c ClientHandle,
    project_id: u64,
    region_id: u64,
}

impl<'c> CloudApi<'c> {
    pub fn new(client: &'c ClientHandle, project_id: u64, region_id: u64) -> Self {
        debug_assert_eq!(client.family(), ApiFamily::Cloud);
        Self {
            client,
            project_id,
            region_id,
        }
    }

    fn networks_path(&self) -> String {
        format!("/v1/networks/{}/{}", self.project_id, self.region_id)
    }

    /// Network list; the raw body is the paginated envelope.
    pub async fn list_networks(&self) -> Result<Decoded<Vec<NetworkSchema>>, CliError> {
        let context = "getting the list of networks";
        let response = self.client.get(&self.networks_path(), context).await?;
        let list: NetworkList = response.json(context)?;
        Ok(Decoded {
            value: list.results,
            body: response.body,
        })
    }

    pub async fn get_network(&self, id: &str) -> Result<Decoded<NetworkSchema>, CliError> {
        let context = "getting network details";
        let path = format!("{}/{}", self.networks_path(), id);
        let response = self.client.get(&path, context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn create_network(&self, body: &CreateNetwork) -> Result<Decoded<TaskList>, CliError> {
        let context = "creating network";
        let response = self
            .client
            .post_json(&self.networks_path(), body, context)
            .await?;
        Decoded::from_response(response, context)
    }

    pub async fn rename_network(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Decoded<NetworkSchema>, CliError> {
        let context = "renaming network";
        let path = format!("{}/{}", self.networks_path(), id);
        let body = serde_json::json!({ "name": name });
        let response = self.client.patch_json(&path, &body, context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn delete_network(&self, id: &str) -> Result<Decoded<TaskList>, CliError> {
        let context = "deleting network";
        let path = format!("{}/{}", self.networks_path(), id);
        let response = self.client.delete(&path, context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn get_task(&self, id: &str) -> Result<Decoded<Task>, CliError> {
        let context = "getting task status";
        let response = self.client.get(&format!("/v1/tasks/{}", id), context).await?;
        Decoded::from_response(response, context)
    }

    /// Poll a task until it finishes. A task ending in ERROR is a request failure carrying
    /// the task's error text.
    pub async fn wait_for_task(
        &self,
        id: &str,
        policy: PollPolicy,
    ) -> Result<Decoded<Task>, CliError> {
        let started = Instant::now();
        loop {
            let polled = self.get_task(id).await?;
            debug!(task = %id, state = ?polled.value.state, "task polled");
            match polled.value.state {
                TaskState::Finished => {
                    info!(task = %id, elapsed_ms = started.elapsed().as_millis() as u64, "task finished");
                    return Ok(polled);
                }
                TaskState::Error => {
                    return Err(CliError::Request {
                        context: format!("task {} failed", id),
                        status: 200,
                        body: polled.value.error.unwrap_or_default(),
                    });
                }
                TaskState::New | TaskState::Running => {}
            }
            if started.elapsed() >= policy.timeout {
                return Err(CliError::Transport {
                    context: format!("waiting for task {}", id),
                    message: format!("timed out after {}s", policy.timeout.as_secs()),
                });
            }
            tokio::time::sleep(policy.interval).await;
        }
    }
}
