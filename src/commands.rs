//! Command services: one per resource group.
//!
//! Services read everything they need from the [`CommandContext`](crate::context::CommandContext)
//! they are handed, call the typed API and return the rendered output. Argument parsing
//! helpers shared by several groups live here.

pub mod apps;
pub mod binaries;
pub mod init;
pub mod network;
pub mod plans;
pub mod settings;
pub mod stats;

pub use apps::{AppCommandService, CreateAppRequest, UpdateAppRequest};
pub use binaries::BinaryCommandService;
pub use init::{InitCommandService, InitRequest, InitResult};
pub use network::{CreateNetworkRequest, NetworkCommandService};
pub use plans::PlanCommandService;
pub use settings::{ProfileName, ProfileView, SettingsCommandService};
pub use stats::{StatsCommandService, StatsRequest};

use crate::error::CliError;
use std::collections::BTreeMap;

/// Parse a numeric resource id; `what` names it in the error ("app id").
pub fn parse_id(value: &str, what: &str) -> Result<i64, CliError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| CliError::Argument(format!("parsing {}: {}", what, e)))
}

/// Parse repeated `KEY=VALUE` arguments. Later keys win.
pub fn parse_env_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    let mut env = BTreeMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                env.insert(key.trim().to_string(), value.to_string());
            }
            _ => {
                return Err(CliError::Argument(format!(
                    "env entry '{}' must look like KEY=VALUE",
                    pair
                )))
            }
        }
    }
    Ok(env)
}

/// Message printed for operations whose response carries nothing worth rendering.
pub(crate) fn done_message(body: &[u8], raw: bool, human: String) -> String {
    if raw {
        String::from_utf8_lossy(body).into_owned()
    } else {
        human
    }
}
