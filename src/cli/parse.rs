//! CLI parse: clap types for gcore-cli. No behavior; definitions only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gcore-cli - command line client for Gcore cloud resources
#[derive(Parser)]
#[command(name = "gcore-cli")]
#[command(about = "Manage Gcore FastEdge apps and cloud resources from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags accepted at every level of the command tree.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file path (replaces the user-level config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use (default: active_profile from the config file)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// API key, overrides the profile and GCORE_API_KEY
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API root URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Client id
    #[arg(long, global = true)]
    pub client: Option<u64>,

    /// Cloud project id
    #[arg(long, global = true)]
    pub project: Option<u64>,

    /// Cloud region id
    #[arg(long, global = true)]
    pub region: Option<u64>,

    /// Bearer token used when no API key is configured
    #[arg(long, global = true, hide = true)]
    pub cloud_auth_token: Option<String>,

    /// Print the API response body as received
    #[arg(long, global = true)]
    pub output_raw: bool,

    /// Wait for asynchronous operations to finish
    #[arg(long, global = true)]
    pub wait: bool,

    /// Talk to a local API without the per-family path prefix
    #[arg(long, global = true, hide = true)]
    pub local: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Gcore Edge compute solution
    Fastedge {
        #[command(subcommand)]
        command: FastedgeCommands,
    },
    /// Cloud network management commands
    Network {
        #[command(subcommand)]
        command: NetworkCommands,
    },
    /// Inspect and edit the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Create a credential profile
    Init {
        /// Fail instead of prompting for missing values
        #[arg(long)]
        non_interactive: bool,

        /// Make the profile active
        #[arg(long)]
        activate: bool,
    },
}

#[derive(Subcommand)]
pub enum FastedgeCommands {
    /// App-related commands
    Apps {
        #[command(subcommand)]
        command: AppCommands,
    },
    /// Binary-related commands
    Binaries {
        #[command(subcommand)]
        command: BinaryCommands,
    },
    /// Plan-related commands
    Plans {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// App statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
}

#[derive(Subcommand)]
pub enum AppCommands {
    /// Show list of client's apps
    #[command(alias = "list")]
    Ls,
    /// Show app details
    Get {
        /// App id
        id: String,
    },
    /// Create a new app
    Create {
        /// App name
        #[arg(long)]
        name: String,
        /// Binary id
        #[arg(long)]
        binary: String,
        /// Plan name
        #[arg(long)]
        plan: Option<String>,
        /// Environment variable (KEY=VALUE), repeatable
        #[arg(long = "env")]
        env: Vec<String>,
        /// Free-form comment
        #[arg(long)]
        comment: Option<String>,
        /// Create the app as a draft instead of enabling it
        #[arg(long)]
        draft: bool,
    },
    /// Change app properties
    Update {
        /// App id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        binary: Option<String>,
        #[arg(long)]
        plan: Option<String>,
        /// Environment variable (KEY=VALUE), repeatable; replaces the app's env
        #[arg(long = "env")]
        env: Vec<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Enable an app
    Enable {
        /// App id
        id: String,
    },
    /// Disable an app
    Disable {
        /// App id
        id: String,
    },
    /// Delete an app
    #[command(alias = "delete")]
    Rm {
        /// App id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum BinaryCommands {
    /// Show list of uploaded binaries
    #[command(alias = "list")]
    Ls,
    /// Show binary details
    Get {
        /// Binary id
        id: String,
    },
    /// Upload a compiled wasm module
    Upload {
        /// Path to the .wasm file
        file: PathBuf,
    },
    /// Delete a binary
    #[command(alias = "delete")]
    Rm {
        /// Binary id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show available plans
    #[command(alias = "list")]
    Ls,
    /// Show plan limits
    Get {
        /// Plan name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum StatsCommands {
    /// Call counts per status code
    Calls(StatsArgs),
    /// Execution duration percentiles
    Duration(StatsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Limit to one app
    #[arg(long)]
    pub app: Option<String>,
    /// Start of the window (RFC 3339)
    #[arg(long)]
    pub from: String,
    /// End of the window (RFC 3339, default: now)
    #[arg(long)]
    pub to: Option<String>,
    /// Bucket size in seconds
    #[arg(long, default_value = "3600")]
    pub step: u64,
}

#[derive(Subcommand)]
pub enum NetworkCommands {
    /// List networks
    #[command(alias = "list")]
    Ls,
    /// Show network details
    Show {
        /// Network id
        id: String,
    },
    /// Create a network
    Create {
        /// Network name
        #[arg(long)]
        name: String,
        /// Network type
        #[arg(long = "type", value_enum, default_value_t = NetworkTypeArg::Vxlan)]
        network_type: NetworkTypeArg,
        /// Do not create a router for the network
        #[arg(long)]
        no_router: bool,
    },
    /// Rename a network
    Rename {
        /// Network id
        id: String,
        /// New name
        name: String,
    },
    /// Delete a network
    #[command(alias = "delete")]
    Rm {
        /// Network id
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkTypeArg {
    Vxlan,
    Vlan,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved profile (secrets masked)
    Show,
    /// Set a profile field (api-key, api-url, client-id, project-id, region-id, cloud-auth-token)
    /// or active-profile
    Set {
        key: String,
        /// New value; an empty string clears the field
        value: String,
    },
    /// List configured profiles
    Profiles,
}
