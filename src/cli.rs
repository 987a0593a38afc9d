//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to command services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_family, command_name};
pub use output::map_error;
pub use parse::{
    AppCommands, BinaryCommands, Cli, Commands, ConfigCommands, FastedgeCommands, GlobalArgs,
    NetworkCommands, NetworkTypeArg, PlanCommands, StatsArgs, StatsCommands,
};
pub use presentation::{
    default_registry, format_app, format_app_list, format_init_summary, register_all,
    NetworkView,
};
pub use route::{options_from_args, overrides_from_args, RunContext};
