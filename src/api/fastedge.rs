//! FastEdge (edge compute) endpoints: apps, binaries, plans, statistics.

use crate::client::{ApiFamily, ApiResponse, ClientHandle, Decoded};
use crate::error::CliError;
use crate::render::{Resource, TypeTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// App status codes as reported by the API.
pub const APP_STATUS_DRAFT: i64 = 0;
pub const APP_STATUS_ENABLED: i64 = 1;
pub const APP_STATUS_DISABLED: i64 = 2;

/// Human name of an app status code.
pub fn app_status_name(status: i64) -> &'static str {
    match status {
        0 => "draft",
        1 => "enabled",
        2 => "disabled",
        3 => "rate limit (hourly limit)",
        4 => "rate limit (daily limit)",
        5 => "suspended",
        _ => "unknown",
    }
}

/// Entry of the app list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Resource for AppSummary {
    const TAG: TypeTag = TypeTag::AppSummary;
}

/// Full app details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub binary: i64,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Resource for App {
    const TAG: TypeTag = TypeTag::App;
}

/// Body of app create/update calls. Unset fields are left out so PATCH keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl AppPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySummary {
    pub id: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unref_since: Option<String>,
}

impl Resource for BinarySummary {
    const TAG: TypeTag = TypeTag::BinarySummary;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binary {
    pub id: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unref_since: Option<String>,
}

impl Resource for Binary {
    const TAG: TypeTag = TypeTag::Binary;
}

/// Plan names are returned as a bare string array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanName(pub String);

impl Resource for PlanName {
    const TAG: TypeTag = TypeTag::PlanName;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub max_duration: Option<u64>,
    #[serde(default)]
    pub mem_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_subrequests: Option<u64>,
}

impl Resource for Plan {
    const TAG: TypeTag = TypeTag::Plan;
}

/// Calls per status code within one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCount {
    pub status: i64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStats {
    pub time: String,
    #[serde(default)]
    pub count: Vec<CallCount>,
}

impl Resource for CallStats {
    const TAG: TypeTag = TypeTag::CallStats;
}

/// Execution duration percentiles (microseconds) within one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationStats {
    pub time: String,
    #[serde(default)]
    pub min: u64,
    #[serde(default)]
    pub max: u64,
    #[serde(default)]
    pub avg: u64,
    #[serde(default)]
    pub median: u64,
    #[serde(default)]
    pub perc75: u64,
    #[serde(default)]
    pub perc90: u64,
}

impl Resource for DurationStats {
    const TAG: TypeTag = TypeTag::DurationStats;
}

#[derive(Debug, Clone, Deserialize)]
struct StatsEnvelope<T> {
    #[serde(default = "Vec::new")]
    stats: Vec<T>,
}

/// Query for the statistics endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsQuery {
    pub from: String,
    pub to: String,
    pub step: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// FastEdge endpoint set bound to one client.
#[derive(Debug, Clone, Copy)]
pub struct FastEdgeApi<'c> {
    client: &'c ClientHandle,
}

impl<'c> FastEdgeApi<'c> {
    pub fn new(client: &'c ClientHandle) -> Self {
        debug_assert_eq!(client.family(), ApiFamily::FastEdge);
        Self { client }
    }

    pub async fn list_apps(&self) -> Result<Decoded<Vec<AppSummary>>, CliError> {
        let context = "getting the list of apps";
        let response = self.client.get("/v1/apps", context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn get_app(&self, id: i64) -> Result<Decoded<App>, CliError> {
        let context = "getting app details";
        let response = self.client.get(&format!("/v1/apps/{}", id), context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn create_app(&self, app: &AppPatch) -> Result<Decoded<App>, CliError> {
        let context = "creating app";
        let response = self.client.post_json("/v1/apps", app, context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn update_app(&self, id: i64, patch: &AppPatch) -> Result<Decoded<App>, CliError> {
        let context = "updating app";
        let response = self
            .client
            .patch_json(&format!("/v1/apps/{}", id), patch, context)
            .await?;
        Decoded::from_response(response, context)
    }

    pub async fn delete_app(&self, id: i64) -> Result<ApiResponse, CliError> {
        self.client
            .delete(&format!("/v1/apps/{}", id), "deleting app")
            .await
    }

    pub async fn list_binaries(&self) -> Result<Decoded<Vec<BinarySummary>>, CliError> {
        let context = "getting the list of binaries";
        let response = self.client.get("/v1/binaries", context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn get_binary(&self, id: i64) -> Result<Decoded<Binary>, CliError> {
        let context = "getting binary details";
        let response = self
            .client
            .get(&format!("/v1/binaries/{}", id), context)
            .await?;
        Decoded::from_response(response, context)
    }

    /// Upload a compiled wasm module.
    pub async fn upload_binary(&self, wasm: Vec<u8>) -> Result<Decoded<BinarySummary>, CliError> {
        let context = "uploading binary";
        let response = self.client.post_bytes("/v1/binaries/raw", wasm, context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn delete_binary(&self, id: i64) -> Result<ApiResponse, CliError> {
        self.client
            .delete(&format!("/v1/binaries/{}", id), "deleting binary")
            .await
    }

    pub async fn list_plans(&self) -> Result<Decoded<Vec<PlanName>>, CliError> {
        let context = "getting the list of plans";
        let response = self.client.get("/v1/plans", context).await?;
        Decoded::from_response(response, context)
    }

    pub async fn get_plan(&self, name: &str) -> Result<Decoded<Plan>, CliError> {
        let context = "getting plan details";
        let response = self
            .client
            .get(&format!("/v1/plans/{}", name), context)
            .await?;
        Decoded::from_response(response, context)
    }

    pub async fn call_stats(&self, query: &StatsQuery) -> Result<Decoded<Vec<CallStats>>, CliError> {
        self.stats("/v1/stats/calls", query, "getting call statistics")
            .await
    }

    pub async fn duration_stats(
        &self,
        query: &StatsQuery,
    ) -> Result<Decoded<Vec<DurationStats>>, CliError> {
        self.stats("/v1/stats/app_duration", query, "getting duration statistics")
            .await
    }

    async fn stats<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &StatsQuery,
        context: &str,
    ) -> Result<Decoded<Vec<T>>, CliError> {
        let response = self.client.get_query(path, query, context).await?;
        let envelope: StatsEnvelope<T> = response.json(context)?;
        Ok(Decoded {
            value: envelope.stats,
            body: response.body,
        })
    }
}
