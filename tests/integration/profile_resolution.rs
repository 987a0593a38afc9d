//! Profile resolution across the config file, environment and flags

use crate::integration::stub_api::StubApi;
use crate::integration::test_utils::with_config_env;
use gcore_cli::cli::{
    default_registry, AppCommands, Commands, ConfigCommands, FastedgeCommands, GlobalArgs,
    RunContext,
};
use gcore_cli::config::{xdg, ConfigLoader};
use gcore_cli::error::CliError;
use tempfile::TempDir;

fn write_global_config(test_dir: &TempDir, content: &str) {
    let dir = test_dir.path().join("gcore-cli");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), content).unwrap();
}

fn config_show(global: &GlobalArgs) -> Result<String, CliError> {
    let registry = default_registry();
    let run = RunContext::new(global, &registry)?;
    run.execute(&Commands::Config {
        command: ConfigCommands::Show,
    })
}

#[test]
fn test_global_config_file_is_picked_up() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(
        &test_dir,
        r#"
active_profile = "staging"

[profiles.staging]
api_key = "staging-secret-key"
api_url = "https://staging.example"
project_id = 5
"#,
    );

    let output = with_config_env(&test_dir, &[], || {
        assert_eq!(
            xdg::default_config_file().unwrap(),
            test_dir.path().join("gcore-cli").join("config.toml")
        );
        config_show(&GlobalArgs::default()).unwrap()
    });

    assert!(output.contains("Name:\tstaging\n"));
    assert!(output.contains("ApiUrl:\thttps://staging.example\n"));
    assert!(output.contains("ProjectId:\t5\n"));
    assert!(!output.contains("staging-secret-key"));
}

#[test]
fn test_env_overrides_file_and_flag_overrides_env() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(
        &test_dir,
        r#"
[profiles.default]
api_key = "file-key"
project_id = 1
region_id = 10
"#,
    );

    let output = with_config_env(
        &test_dir,
        &[("GCORE_PROJECT_ID", "2"), ("GCORE_REGION_ID", "20")],
        || {
            config_show(&GlobalArgs {
                region: Some(30),
                ..Default::default()
            })
            .unwrap()
        },
    );

    assert!(output.contains("ProjectId:\t2\n"));
    assert!(output.contains("RegionId:\t30\n"));
}

#[test]
fn test_explicit_config_replaces_global_file() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(
        &test_dir,
        r#"
[profiles.default]
api_url = "https://global.example"
"#,
    );
    let explicit = test_dir.path().join("explicit.toml");
    std::fs::write(
        &explicit,
        r#"
[profiles.default]
api_url = "https://explicit.example"
"#,
    )
    .unwrap();

    let output = with_config_env(&test_dir, &[], || {
        config_show(&GlobalArgs {
            config: Some(explicit.clone()),
            ..Default::default()
        })
        .unwrap()
    });

    assert!(output.contains("ApiUrl:\thttps://explicit.example\n"));
}

#[test]
fn test_no_credentials_anywhere_fails_with_hint() {
    let test_dir = TempDir::new().unwrap();

    let err = with_config_env(&test_dir, &[], || {
        let registry = default_registry();
        let run = RunContext::new(&GlobalArgs::default(), &registry).unwrap();
        run.execute(&Commands::Fastedge {
            command: FastedgeCommands::Apps {
                command: AppCommands::Ls,
            },
        })
        .unwrap_err()
    });

    assert!(matches!(err, CliError::Configuration { .. }));
    assert!(err.to_string().starts_with("configuration error:"));
    assert!(err.hint().unwrap().contains("gcore-cli init"));
}

#[test]
fn test_env_key_reaches_the_wire() {
    let test_dir = TempDir::new().unwrap();
    let stub = StubApi::new()
        .respond("GET", "/fastedge/v1/apps", 200, "[]")
        .spawn()
        .unwrap();

    let output = with_config_env(
        &test_dir,
        &[("GCORE_API_KEY", "env-key"), ("GCORE_API_URL", stub.base_url())],
        || {
            let registry = default_registry();
            let run = RunContext::new(&GlobalArgs::default(), &registry).unwrap();
            run.execute(&Commands::Fastedge {
                command: FastedgeCommands::Apps {
                    command: AppCommands::Ls,
                },
            })
            .unwrap()
        },
    );

    assert_eq!(output, "you have no apps\n");
    let seen = stub.requests_to("GET", "/fastedge/v1/apps");
    assert_eq!(seen[0].authorization.as_deref(), Some("APIKey env-key"));
}

#[test]
fn test_config_set_then_profiles() {
    let test_dir = TempDir::new().unwrap();

    let output = with_config_env(&test_dir, &[], || {
        let registry = default_registry();
        let global = GlobalArgs {
            profile: Some("staging".to_string()),
            ..Default::default()
        };
        let run = RunContext::new(&global, &registry).unwrap();
        run.execute(&Commands::Config {
            command: ConfigCommands::Set {
                key: "api-url".to_string(),
                value: "https://staging.example".to_string(),
            },
        })
        .unwrap();

        let path = xdg::default_config_file().unwrap();
        let written = ConfigLoader::load_for_edit(&path).unwrap();
        assert_eq!(
            written.profile("staging").and_then(|p| p.api_url.as_deref()),
            Some("https://staging.example")
        );

        let run = RunContext::new(&GlobalArgs::default(), &registry).unwrap();
        run.execute(&Commands::Config {
            command: ConfigCommands::Profiles,
        })
        .unwrap()
    });

    assert_eq!(output, "  staging\thttps://staging.example\n");
}

#[test]
fn test_mixed_case_profile_from_init_is_usable() {
    let test_dir = TempDir::new().unwrap();
    let stub = StubApi::new()
        .respond("GET", "/fastedge/v1/apps", 200, "[]")
        .spawn()
        .unwrap();

    let (shown, selected) = with_config_env(&test_dir, &[], || {
        let registry = default_registry();
        let init = GlobalArgs {
            profile: Some("Prod".to_string()),
            api_key: Some("prod-secret-key".to_string()),
            api_url: Some(stub.base_url().to_string()),
            ..Default::default()
        };
        RunContext::new(&init, &registry)
            .unwrap()
            .execute(&Commands::Init {
                non_interactive: true,
                activate: true,
            })
            .unwrap();

        // active profile, no selection
        let run = RunContext::new(&GlobalArgs::default(), &registry).unwrap();
        let shown = run
            .execute(&Commands::Config {
                command: ConfigCommands::Show,
            })
            .unwrap();
        run.execute(&Commands::Fastedge {
            command: FastedgeCommands::Apps {
                command: AppCommands::Ls,
            },
        })
        .unwrap();

        // explicit selection in a different case
        let global = GlobalArgs {
            profile: Some("PROD".to_string()),
            ..Default::default()
        };
        let selected = config_show(&global).unwrap();
        (shown, selected)
    });

    assert!(shown.contains("Name:\tprod\n"));
    assert!(selected.contains("Name:\tprod\n"));
    let seen = stub.requests_to("GET", "/fastedge/v1/apps");
    assert_eq!(seen[0].authorization.as_deref(), Some("APIKey prod-secret-key"));
}

#[test]
fn test_missing_active_profile_is_reported_by_name() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(
        &test_dir,
        r#"
active_profile = "gone"

[profiles.default]
api_key = "file-key"
"#,
    );

    let err = with_config_env(&test_dir, &[], || {
        config_show(&GlobalArgs::default()).unwrap_err()
    });

    assert!(matches!(err, CliError::Configuration { .. }));
    assert!(err.to_string().contains("profile 'gone' not found"));
}
