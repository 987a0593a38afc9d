//! gcore-cli binary
//!
//! Command-line client for Gcore FastEdge and cloud resources.

use clap::Parser;
use gcore_cli::cli::{default_registry, map_error, Cli, RunContext};
use gcore_cli::config::ConfigLoader;
use gcore_cli::error::CliError;
use gcore_cli::logging::{init_logging, LoggingConfig};
use owo_colors::{OwoColorize, Stream};
use std::io::Write;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("gcore-cli starting");

    // Renderers are registered once, then the registry is read-only
    let registry = default_registry();

    let context = match RunContext::new(&cli.global, &registry) {
        Ok(ctx) => ctx,
        Err(e) => fail(&e),
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(output.as_bytes());
            if !output.is_empty() && !output.ends_with('\n') {
                let _ = stdout.write_all(b"\n");
            }
            let _ = stdout.flush();
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &CliError) -> ! {
    error!(stage = e.stage(), "{}", e);
    let message = map_error(e);
    eprintln!(
        "{}",
        message.if_supports_color(Stream::Stderr, |text| text.red())
    );
    process::exit(1);
}

/// Build logging configuration from CLI args and the config file
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let global = &cli.global;

    // Missing or broken config files are reported by the command itself
    let mut config = ConfigLoader::load(global.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    // Logging is off unless asked for, since stdout carries command output
    config.enabled = config.enabled || global.verbose || global.log_level.is_some();

    if let Some(ref level) = global.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = global.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = global.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = global.log_file {
        config.file = Some(file.clone());
    }

    config
}
