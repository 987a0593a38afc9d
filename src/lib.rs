//! gcore-cli: command line client for Gcore FastEdge and cloud resources
//!
//! Commands resolve one credential profile per invocation, build an HTTP client per API
//! family and render responses through a registry of per-type renderers.

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod profile;
pub mod render;
