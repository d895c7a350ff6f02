//! The compiled binary against the fixture server

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use super::helpers::{created_plan, preview_response, FixtureServer};

fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_release-plan"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("RELEASE_PLAN_TOKEN", "cli-token")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_ACTIONS")
        .env_remove("RELEASE_PLAN_CONFIG")
        .env_remove("RELEASE_PLAN_URL")
        .env_remove("RELEASE_PLAN_PROJECT")
        .env_remove("RELEASE_PLAN_RELEASE")
        .env_remove("RELEASE_PLAN_TARGETS")
        .env_remove("RELEASE_PLAN_CHECK_POLICY")
        .env_remove("RELEASE_PLAN_ALLOW_OUT_OF_ORDER")
        .env_remove("RELEASE_PLAN_OUTPUT_FILE")
        .env_remove("RELEASE_PLAN_POLL_INTERVAL_MS")
        .env_remove("RELEASE_PLAN_MAX_POLL_CYCLES")
        .env_remove("RELEASE_PLAN_POLL_TIMEOUT_SECS")
        .output()
        .expect("Failed to run release-plan")
}

#[test]
fn test_cli_deploy_with_config_file_writes_outputs() {
    let server = FixtureServer::start(|request| match request.path() {
        "/v1/projects/demo:previewPlan" => (
            200,
            preview_response(r#"{"steps":[{"specs":[{"id":"1"}]}]}"#, "[]", "[]"),
        ),
        "/v1/projects/demo/plans" => (200, created_plan("projects/demo/plans/77")),
        _ => (500, r#"{"message":"unexpected"}"#.to_string()),
    });

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("release-plan.toml");
    std::fs::write(
        &config_path,
        format!(
            "service-url = \"{}\"\nproject = \"demo\"\ncheck-policy = \"SKIP\"\n",
            server.url()
        ),
    )
    .unwrap();
    let output_path = temp_dir.path().join("outputs");

    let output = run_cli(
        temp_dir.path(),
        &[
            "deploy",
            "--config",
            config_path.to_str().unwrap(),
            "--release",
            "projects/demo/releases/3",
            "--targets",
            "instances/prod/databases/app,instances/prod/databases/app",
            "--output-file",
            output_path.to_str().unwrap(),
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let outputs = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        outputs,
        "deployment-required=true\nplan=projects/demo/plans/77\n"
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("authorization"), Some("Bearer cli-token"));
    let preview: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        preview["targets"],
        serde_json::json!(["instances/prod/databases/app"])
    );
}

#[test]
fn test_cli_unknown_policy_fails_before_any_request() {
    let server = FixtureServer::start(|_| (200, "{}".to_string()));
    let temp_dir = TempDir::new().unwrap();

    let output = run_cli(
        temp_dir.path(),
        &[
            "deploy",
            "--url",
            &server.url(),
            "--project",
            "demo",
            "--release",
            "projects/demo/releases/3",
            "--targets",
            "db1",
            "--check-policy",
            "FAIL_SOMETIMES",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown check policy"), "stderr: {stderr}");
    assert!(server.requests().is_empty());
}

#[test]
fn test_cli_strict_out_of_order_fails() {
    let server = FixtureServer::start(|_| {
        (
            200,
            preview_response(
                r#"{"steps":[{"specs":[{"id":"1"}]}]}"#,
                r#"[{"database":"db1","files":["v2.sql"]}]"#,
                "[]",
            ),
        )
    });
    let temp_dir = TempDir::new().unwrap();

    let output = run_cli(
        temp_dir.path(),
        &[
            "deploy",
            "--url",
            &server.url(),
            "--project",
            "projects/demo",
            "--release",
            "projects/demo/releases/3",
            "--targets",
            "db1",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("found out of order files"), "stderr: {stderr}");
    assert!(stderr.contains("db1: v2.sql"), "stderr: {stderr}");
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_cli_check_waits_for_existing_plan() {
    let server = FixtureServer::start(|request| match request.path() {
        "/v1/projects/demo/plans/77:runPlanChecks" => (200, "{}".to_string()),
        "/v1/projects/demo/plans/77/planCheckRuns" => (
            200,
            r#"{"planCheckRuns":[{"status":"DONE","results":[{"status":"SUCCESS","title":"OK"}]}],"nextPageToken":""}"#
                .to_string(),
        ),
        _ => (500, r#"{"message":"unexpected"}"#.to_string()),
    });
    let temp_dir = TempDir::new().unwrap();

    let output = run_cli(
        temp_dir.path(),
        &[
            "check",
            "--plan",
            "projects/demo/plans/77",
            "--url",
            &server.url(),
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        server.paths(),
        vec![
            "/v1/projects/demo/plans/77:runPlanChecks",
            "/v1/projects/demo/plans/77/planCheckRuns",
        ]
    );
}
