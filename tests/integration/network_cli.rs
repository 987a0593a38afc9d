//! Cloud network commands against a stub API

use crate::integration::stub_api::StubApi;
use crate::integration::test_utils::{run_with, stub_config, stub_options};
use gcore_cli::cli::{Commands, NetworkCommands, NetworkTypeArg};
use gcore_cli::config::CliConfig;
use gcore_cli::error::CliError;
use gcore_cli::profile::ProfileOverrides;
use gcore_cli::render::OutputMode;

const NETWORK: &str = r#"{
    "id": "net-1",
    "name": "backend",
    "type": "vxlan",
    "external": false,
    "default": false,
    "shared": false,
    "mtu": 1450,
    "subnets": ["sub-1"],
    "metadata": [],
    "segmentation_id": 12,
    "project_id": 1,
    "region": "Luxembourg",
    "region_id": 76,
    "created_at": "2024-01-01T00:00:00+0000"
}"#;

fn network(command: NetworkCommands) -> Commands {
    Commands::Network { command }
}

#[test]
fn test_list_unwraps_results_envelope() {
    let stub = StubApi::new()
        .respond(
            "GET",
            "/cloud/v1/networks/1/76",
            200,
            &format!(r#"{{"count":1,"results":[{}]}}"#, NETWORK),
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Ls),
    )
    .unwrap();

    assert!(output.contains("net-1"));
    assert!(output.contains("backend"));
    assert!(output.contains("Luxembourg"));
}

#[test]
fn test_empty_list_prints_hint() {
    let stub = StubApi::new()
        .respond("GET", "/cloud/v1/networks/1/76", 200, r#"{"count":0,"results":[]}"#)
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Ls),
    )
    .unwrap();

    assert_eq!(output, "you have no networks\n");
}

#[test]
fn test_show_renders_key_value_block() {
    let stub = StubApi::new()
        .respond("GET", "/cloud/v1/networks/1/76/net-1", 200, NETWORK)
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Show {
            id: "net-1".to_string(),
        }),
    )
    .unwrap();

    assert!(output.contains("Id:\tnet-1\n"));
    assert!(output.contains("Type:\tvxlan\n"));
    assert!(output.contains("Mtu:\t1450\n"));
}

#[test]
fn test_missing_project_is_configuration_error() {
    let mut config = stub_config("http://127.0.0.1:9");
    if let Some(profile) = config.profiles.get_mut("default") {
        profile.project_id = None;
    }

    let err = run_with(
        config,
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Ls),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Configuration { .. }));
    assert!(err.hint().unwrap().contains("--project"));
}

#[test]
fn test_create_without_wait_prints_task_ids() {
    let stub = StubApi::new()
        .respond("POST", "/cloud/v1/networks/1/76", 200, r#"{"tasks":["task-1"]}"#)
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Create {
            name: "backend".to_string(),
            network_type: NetworkTypeArg::Vlan,
            no_router: true,
        }),
    )
    .unwrap();

    assert_eq!(output, "Task:\ttask-1\n");
    let seen = stub.requests_to("POST", "/cloud/v1/networks/1/76");
    let sent: serde_json::Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({"name": "backend", "type": "vlan", "create_router": false})
    );
}

#[test]
fn test_create_with_wait_shows_created_network() {
    let stub = StubApi::new()
        .respond("POST", "/cloud/v1/networks/1/76", 200, r#"{"tasks":["task-1"]}"#)
        .respond(
            "GET",
            "/cloud/v1/tasks/task-1",
            200,
            r#"{"id":"task-1","state":"FINISHED","created_resources":{"networks":["net-1"]}}"#,
        )
        .respond("GET", "/cloud/v1/networks/1/76/net-1", 200, NETWORK)
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, true),
        &network(NetworkCommands::Create {
            name: "backend".to_string(),
            network_type: NetworkTypeArg::Vxlan,
            no_router: false,
        }),
    )
    .unwrap();

    assert!(output.contains("Id:\tnet-1\n"));
    assert_eq!(stub.requests_to("GET", "/cloud/v1/tasks/task-1").len(), 1);
}

#[test]
fn test_failed_task_surfaces_task_error() {
    let stub = StubApi::new()
        .respond("DELETE", "/cloud/v1/networks/1/76/net-1", 200, r#"{"tasks":["task-2"]}"#)
        .respond(
            "GET",
            "/cloud/v1/tasks/task-2",
            200,
            r#"{"id":"task-2","state":"ERROR","error":"network is in use"}"#,
        )
        .spawn()
        .unwrap();

    let err = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, true),
        &network(NetworkCommands::Rm {
            id: "net-1".to_string(),
        }),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Request { .. }));
    assert!(err.to_string().contains("network is in use"));
}

#[test]
fn test_delete_with_wait_prints_confirmation() {
    let stub = StubApi::new()
        .respond("DELETE", "/cloud/v1/networks/1/76/net-1", 200, r#"{"tasks":["task-3"]}"#)
        .respond(
            "GET",
            "/cloud/v1/tasks/task-3",
            200,
            r#"{"id":"task-3","state":"FINISHED"}"#,
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, true),
        &network(NetworkCommands::Rm {
            id: "net-1".to_string(),
        }),
    )
    .unwrap();

    assert_eq!(output, "Network net-1 deleted\n");
}

#[test]
fn test_invalid_name_is_rejected_before_request() {
    let stub = StubApi::new().spawn().unwrap();

    let err = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Rename {
            id: "net-1".to_string(),
            name: "-bad".to_string(),
        }),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Argument(_)));
    assert!(stub.requests().is_empty());
}

#[test]
fn test_bearer_token_when_no_api_key() {
    let stub = StubApi::new()
        .respond("GET", "/cloud/v1/networks/1/76", 200, r#"{"results":[]}"#)
        .spawn()
        .unwrap();

    let mut config = CliConfig::default();
    config.api_url = stub.base_url().to_string();
    run_with(
        config,
        ProfileOverrides {
            cloud_auth_token: Some("jwt".to_string()),
            project_id: Some(1),
            region_id: Some(76),
            ..Default::default()
        },
        stub_options(OutputMode::Human, false),
        &network(NetworkCommands::Ls),
    )
    .unwrap();

    let seen = stub.requests_to("GET", "/cloud/v1/networks/1/76");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer jwt"));
}
