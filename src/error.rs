//! Error types for the Gcore CLI.
//!
//! Every variant names the stage of the command pipeline that failed so the top-level
//! runner can print a stable prefix and exit non-zero.

use thiserror::Error;

/// Hint attached to configuration errors caused by missing credentials.
pub const CREDENTIALS_HINT: &str = "See gcore-cli init, gcore-cli config";

/// Errors surfaced by the command pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or invalid profile/credential material.
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        hint: Option<String>,
    },

    /// The HTTP transport for an API family could not be constructed.
    #[error("client init error: cannot init SDK: {0}")]
    ClientInit(String),

    /// The API answered with a non-2xx status. `body` is the server payload, verbatim.
    #[error("request failed ({context}, status {status}): {body}")]
    Request {
        context: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("request failed ({context}): {message}")]
    Transport { context: String, message: String },

    /// A value reached the encoder that cannot be encoded.
    #[error("render error: {0}")]
    Render(String),

    /// Malformed CLI input.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The user interrupted a pending network call.
    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Configuration error without a follow-up hint.
    pub fn config(message: impl Into<String>) -> Self {
        CliError::Configuration {
            message: message.into(),
            hint: None,
        }
    }

    /// Configuration error pointing at the init/config subcommands.
    pub fn missing_credential(message: impl Into<String>) -> Self {
        CliError::Configuration {
            message: message.into(),
            hint: Some(CREDENTIALS_HINT.to_string()),
        }
    }

    /// Actionable follow-up for the user, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::Configuration { hint, .. } => hint.as_deref(),
            CliError::ClientInit(_) => Some("Check api_url in the active profile"),
            _ => None,
        }
    }

    /// Short stage label used in log records.
    pub fn stage(&self) -> &'static str {
        match self {
            CliError::Configuration { .. } => "configuration",
            CliError::ClientInit(_) => "client_init",
            CliError::Request { .. } | CliError::Transport { .. } => "request",
            CliError::Render(_) => "render",
            CliError::Argument(_) => "argument",
            CliError::Cancelled(_) => "cancelled",
            CliError::Io(_) => "io",
        }
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Render(err.to_string())
    }
}
