//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::{
    AppCommands, BinaryCommands, Commands, ConfigCommands, FastedgeCommands, NetworkCommands,
    PlanCommands, StatsCommands,
};
use crate::client::ApiFamily;

/// Command name string for log records (e.g. "fastedge.apps.ls", "network.create").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Fastedge { command } => format!("fastedge.{}", fastedge_command_name(command)),
        Commands::Network { command } => format!("network.{}", network_command_name(command)),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
        Commands::Init { .. } => "init".to_string(),
    }
}

/// API family a command group talks to; `None` for groups that never call the API.
pub fn command_family(command: &Commands) -> Option<ApiFamily> {
    match command {
        Commands::Fastedge { .. } => Some(ApiFamily::FastEdge),
        Commands::Network { .. } => Some(ApiFamily::Cloud),
        Commands::Config { .. } | Commands::Init { .. } => None,
    }
}

pub fn fastedge_command_name(command: &FastedgeCommands) -> String {
    match command {
        FastedgeCommands::Apps { command } => format!("apps.{}", app_command_name(command)),
        FastedgeCommands::Binaries { command } => {
            format!("binaries.{}", binary_command_name(command))
        }
        FastedgeCommands::Plans { command } => format!("plans.{}", plan_command_name(command)),
        FastedgeCommands::Stats { command } => format!("stats.{}", stats_command_name(command)),
    }
}

pub fn app_command_name(command: &AppCommands) -> &'static str {
    match command {
        AppCommands::Ls => "ls",
        AppCommands::Get { .. } => "get",
        AppCommands::Create { .. } => "create",
        AppCommands::Update { .. } => "update",
        AppCommands::Enable { .. } => "enable",
        AppCommands::Disable { .. } => "disable",
        AppCommands::Rm { .. } => "rm",
    }
}

pub fn binary_command_name(command: &BinaryCommands) -> &'static str {
    match command {
        BinaryCommands::Ls => "ls",
        BinaryCommands::Get { .. } => "get",
        BinaryCommands::Upload { .. } => "upload",
        BinaryCommands::Rm { .. } => "rm",
    }
}

pub fn plan_command_name(command: &PlanCommands) -> &'static str {
    match command {
        PlanCommands::Ls => "ls",
        PlanCommands::Get { .. } => "get",
    }
}

pub fn stats_command_name(command: &StatsCommands) -> &'static str {
    match command {
        StatsCommands::Calls(_) => "calls",
        StatsCommands::Duration(_) => "duration",
    }
}

pub fn network_command_name(command: &NetworkCommands) -> &'static str {
    match command {
        NetworkCommands::Ls => "ls",
        NetworkCommands::Show { .. } => "show",
        NetworkCommands::Create { .. } => "create",
        NetworkCommands::Rename { .. } => "rename",
        NetworkCommands::Rm { .. } => "rm",
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
        ConfigCommands::Set { .. } => "set",
        ConfigCommands::Profiles => "profiles",
    }
}
