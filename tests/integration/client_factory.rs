//! Client construction and command context lifecycle

use crate::integration::stub_api::StubApi;
use crate::integration::test_utils::{run_with, stub_config, stub_options};
use gcore_cli::cli::{Commands, FastedgeCommands, PlanCommands};
use gcore_cli::client::{ApiFamily, ClientFactory};
use gcore_cli::config::CliConfig;
use gcore_cli::context::{ContextBuilder, ContextState, GlobalOptions};
use gcore_cli::error::CliError;
use gcore_cli::profile::{EnvLayer, ProfileOverrides, ResolveContext};
use gcore_cli::render::{OutputMode, RenderRegistry, Renderer};

fn plans() -> Commands {
    Commands::Fastedge {
        command: FastedgeCommands::Plans {
            command: PlanCommands::Ls,
        },
    }
}

#[test]
fn test_local_mode_talks_to_root_without_suffix() {
    let stub = StubApi::new()
        .respond("GET", "/v1/plans", 200, r#"["basic"]"#)
        .spawn()
        .unwrap();

    let options = GlobalOptions {
        local: true,
        ..stub_options(OutputMode::Human, false)
    };
    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        options,
        &plans(),
    )
    .unwrap();

    assert_eq!(output, "basic\n");
    assert_eq!(stub.requests_to("GET", "/v1/plans").len(), 1);
}

#[test]
fn test_invalid_api_url_is_client_init_error() {
    let err = run_with(
        stub_config("not a url"),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &plans(),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::ClientInit(_)));
    assert!(err.to_string().starts_with("client init error: cannot init SDK"));
}

#[test]
fn test_unreachable_api_is_transport_error() {
    // Port 9 (discard) is not listening on loopback in test environments
    let err = run_with(
        stub_config("http://127.0.0.1:9"),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &plans(),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Transport { .. }));
    assert_eq!(err.stage(), "request");
}

#[test]
fn test_context_is_ready_with_requested_clients() {
    let config = stub_config("https://api.example");
    let env = EnvLayer::default();
    let flags = ProfileOverrides::default();
    let registry = RenderRegistry::new();

    let builder = ContextBuilder::new(
        ResolveContext {
            config: &config,
            env: &env,
            flags: &flags,
        },
        GlobalOptions::default(),
    );
    assert_eq!(builder.state(), ContextState::Uninitialized);

    let ctx = builder
        .build(&[ApiFamily::FastEdge], Renderer::new(&registry))
        .unwrap();
    assert_eq!(ctx.state(), ContextState::Ready);
    assert_eq!(
        ctx.client(ApiFamily::FastEdge).unwrap().base_url(),
        "https://api.example/fastedge"
    );
    assert!(ctx.client(ApiFamily::Cloud).is_err());
}

#[test]
fn test_context_build_fails_without_credentials() {
    let config = CliConfig::default();
    let env = EnvLayer::default();
    let flags = ProfileOverrides::default();
    let registry = RenderRegistry::new();

    let result = ContextBuilder::new(
        ResolveContext {
            config: &config,
            env: &env,
            flags: &flags,
        },
        GlobalOptions::default(),
    )
    .build(&[ApiFamily::FastEdge, ApiFamily::Cloud], Renderer::new(&registry));

    assert!(matches!(result, Err(CliError::Configuration { .. })));
}

#[test]
fn test_effective_base_url_trims_trailing_slash() {
    assert_eq!(
        ClientFactory::effective_base_url("https://api.example/", ApiFamily::Cloud, false),
        "https://api.example/cloud"
    );
    assert_eq!(
        ClientFactory::effective_base_url("https://api.example/", ApiFamily::Cloud, true),
        "https://api.example"
    );
}
