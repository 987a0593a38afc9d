//! FastEdge command group against a stub API

use crate::integration::stub_api::StubApi;
use crate::integration::test_utils::{run_with, stub_config, stub_options};
use gcore_cli::cli::{
    AppCommands, BinaryCommands, Commands, FastedgeCommands, PlanCommands, StatsArgs,
    StatsCommands,
};
use gcore_cli::error::CliError;
use gcore_cli::profile::ProfileOverrides;
use gcore_cli::render::OutputMode;
use tempfile::TempDir;

fn apps(command: AppCommands) -> Commands {
    Commands::Fastedge {
        command: FastedgeCommands::Apps { command },
    }
}

fn binaries(command: BinaryCommands) -> Commands {
    Commands::Fastedge {
        command: FastedgeCommands::Binaries { command },
    }
}

#[test]
fn test_empty_app_list_prints_hint() {
    let stub = StubApi::new()
        .respond("GET", "/fastedge/v1/apps", 200, "[]")
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Ls),
    )
    .unwrap();

    assert_eq!(output, "you have no apps\n");
}

#[test]
fn test_app_list_block_and_auth_header() {
    let stub = StubApi::new()
        .respond(
            "GET",
            "/fastedge/v1/apps",
            200,
            r#"[{"id":7,"name":"hello","status":1,"url":"https://hello.example"}]"#,
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Ls),
    )
    .unwrap();

    assert_eq!(
        output,
        "ID: 7\n\tStatus:\tenabled\n\tName:\thello\n\tUrl:\thttps://hello.example\n"
    );
    let seen = stub.requests_to("GET", "/fastedge/v1/apps");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("APIKey test-key"));
}

#[test]
fn test_raw_output_is_the_body_verbatim() {
    let body = r#"[ {"id": 7, "name": "hello", "status": 1, "extra": {"kept": true}} ]"#;
    let stub = StubApi::new()
        .respond("GET", "/fastedge/v1/apps", 200, body)
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Raw, false),
        &apps(AppCommands::Ls),
    )
    .unwrap();

    assert_eq!(output, body);
}

#[test]
fn test_flag_key_overrides_profile_key() {
    let stub = StubApi::new()
        .respond("GET", "/fastedge/v1/plans", 200, r#"["basic","pro"]"#)
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides {
            api_key: Some("flag-key".to_string()),
            ..Default::default()
        },
        stub_options(OutputMode::Human, false),
        &Commands::Fastedge {
            command: FastedgeCommands::Plans {
                command: PlanCommands::Ls,
            },
        },
    )
    .unwrap();

    assert_eq!(output, "basic\npro\n");
    let seen = stub.requests_to("GET", "/fastedge/v1/plans");
    assert_eq!(seen[0].authorization.as_deref(), Some("APIKey flag-key"));
}

#[test]
fn test_app_get_renders_details() {
    let stub = StubApi::new()
        .respond(
            "GET",
            "/fastedge/v1/apps/7",
            200,
            r#"{"name":"hello","binary":12,"plan":"basic","status":2,"url":"https://hello.example","env":{"MODE":"prod"}}"#,
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Get {
            id: "7".to_string(),
        }),
    )
    .unwrap();

    assert!(output.starts_with(
        "Name:\thello\nBinary:\t12\nPlan:\tbasic\nStatus:\tdisabled\nUrl:\thttps://hello.example\n"
    ));
    assert!(output.contains("MODE"));
}

#[test]
fn test_app_id_must_be_numeric() {
    let err = run_with(
        stub_config("http://127.0.0.1:9"),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Get {
            id: "seven".to_string(),
        }),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Argument(_)));
    assert!(err.to_string().contains("parsing app id"));
}

#[test]
fn test_server_error_keeps_status_and_body() {
    let stub = StubApi::new()
        .respond(
            "GET",
            "/fastedge/v1/apps/404",
            404,
            r#"{"error":"app not found"}"#,
        )
        .spawn()
        .unwrap();

    let err = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Get {
            id: "404".to_string(),
        }),
    )
    .unwrap_err();

    match err {
        CliError::Request { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, r#"{"error":"app not found"}"#);
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[test]
fn test_create_sends_enabled_status_and_env() {
    let stub = StubApi::new()
        .respond(
            "POST",
            "/fastedge/v1/apps",
            200,
            r#"{"id":9,"name":"edge","binary":3,"status":1}"#,
        )
        .spawn()
        .unwrap();

    run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Create {
            name: "edge".to_string(),
            binary: "3".to_string(),
            plan: None,
            env: vec!["A=1".to_string()],
            comment: None,
            draft: false,
        }),
    )
    .unwrap();

    let seen = stub.requests_to("POST", "/fastedge/v1/apps");
    assert_eq!(seen.len(), 1);
    let sent: serde_json::Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({"name": "edge", "binary": 3, "status": 1, "env": {"A": "1"}})
    );
}

#[test]
fn test_disable_patches_status_only() {
    let stub = StubApi::new()
        .respond(
            "PATCH",
            "/fastedge/v1/apps/5",
            200,
            r#"{"id":5,"name":"edge","binary":3,"status":2}"#,
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Disable {
            id: "5".to_string(),
        }),
    )
    .unwrap();

    assert!(output.contains("Status:\tdisabled\n"));
    let seen = stub.requests_to("PATCH", "/fastedge/v1/apps/5");
    let sent: serde_json::Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(sent, serde_json::json!({"status": 2}));
}

#[test]
fn test_delete_prints_confirmation() {
    let stub = StubApi::new()
        .respond("DELETE", "/fastedge/v1/apps/5", 200, "")
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &apps(AppCommands::Rm {
            id: "5".to_string(),
        }),
    )
    .unwrap();

    assert_eq!(output, "App 5 deleted\n");
}

#[test]
fn test_binary_upload_posts_wasm_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let wasm = temp_dir.path().join("app.wasm");
    std::fs::write(&wasm, b"\0asm\x01\0\0\0").unwrap();

    let stub = StubApi::new()
        .respond(
            "POST",
            "/fastedge/v1/binaries/raw",
            200,
            r#"{"id":44,"status":1,"api_type":"wasi-http"}"#,
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &binaries(BinaryCommands::Upload { file: wasm }),
    )
    .unwrap();

    assert!(output.contains("44"));
    let seen = stub.requests_to("POST", "/fastedge/v1/binaries/raw");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].body, b"\0asm\x01\0\0\0".to_vec());
    assert_eq!(
        seen[0].content_type.as_deref(),
        Some("application/octet-stream")
    );
}

#[test]
fn test_missing_upload_file_fails_before_request() {
    let stub = StubApi::new().spawn().unwrap();

    let err = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &binaries(BinaryCommands::Upload {
            file: "/nonexistent/app.wasm".into(),
        }),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Argument(_)));
    assert!(stub.requests().is_empty());
}

#[test]
fn test_stats_query_parameters() {
    let stub = StubApi::new()
        .respond(
            "GET",
            "/fastedge/v1/stats/calls",
            200,
            r#"{"stats":[{"time":"2024-01-01T00:00:00Z","count":[{"status":200,"count":5}]}]}"#,
        )
        .spawn()
        .unwrap();

    let output = run_with(
        stub_config(stub.base_url()),
        ProfileOverrides::default(),
        stub_options(OutputMode::Human, false),
        &Commands::Fastedge {
            command: FastedgeCommands::Stats {
                command: StatsCommands::Calls(StatsArgs {
                    app: Some("7".to_string()),
                    from: "2024-01-01T00:00:00Z".to_string(),
                    to: Some("2024-01-02T00:00:00Z".to_string()),
                    step: 3600,
                }),
            },
        },
    )
    .unwrap();

    assert!(output.contains("2024-01-01T00:00:00Z"));
    let seen = stub.requests_to("GET", "/fastedge/v1/stats/calls");
    let query = seen[0].query.clone().unwrap();
    assert!(query.contains("step=3600"));
    assert!(query.contains("id=7"));
    assert!(query.contains("from=2024-01-01T00%3A00%3A00Z"));
}
