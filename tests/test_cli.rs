//! CLI surface tests: subcommands, arguments, config and exit codes

mod common;

use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{method, path, header};
use serde_json::json;
use tempfile::TempDir;

use common::{ramjam, ramjam_with_env, write_workflow, ExitStatus, MockEnvironment};

#[test]
fn test_version() {
    let r = ramjam(&["version"]);
    assert_eq!(r.exit_status, ExitStatus::Success);
    assert_eq!(r.stdout.trim(), format!("ramjam version {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand_prints_help() {
    let r = ramjam(&[]);
    assert_eq!(r.exit_status, ExitStatus::Success);
    assert!(r.contains("Usage:"), "{}", r);
    assert!(r.contains("run"), "{}", r);
}

#[test]
fn test_help_flag() {
    let r = ramjam(&["run", "--help"]);
    assert_eq!(r.exit_code, 0);
    assert!(r.contains("--timeout"), "{}", r);
}

#[test]
fn test_unknown_subcommand_is_error() {
    let r = ramjam(&["launch"]);
    assert_eq!(r.exit_status, ExitStatus::Error);
}

#[test]
fn test_run_requires_paths() {
    let r = ramjam(&["run"]);
    assert_eq!(r.exit_status, ExitStatus::Error);
    assert!(r.stderr.contains("PATH"), "{}", r);
}

#[test]
fn test_run_missing_path() {
    let r = ramjam(&["run", "/definitely/not/here.yaml"]);
    assert_eq!(r.exit_status, ExitStatus::Error);
    assert!(r.stderr.contains("Error: unable to access /definitely/not/here.yaml"), "{}", r);
}

#[test]
fn test_run_directory_without_workflows() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "nothing here").unwrap();

    let r = ramjam(&["run", dir.path().to_str().unwrap()]);
    assert_eq!(r.exit_status, ExitStatus::Error);
    assert!(r.stderr.contains("Error: no files found"), "{}", r);
}

#[test]
fn test_invalid_timeout() {
    let dir = TempDir::new().unwrap();
    let file = write_workflow(dir.path(), "a.yaml", "workflow: []\n");

    let r = ramjam(&["run", "-t", "0", file.to_str().unwrap()]);
    assert_eq!(r.exit_status, ExitStatus::Error);
    assert!(r.stderr.contains("timeout must be positive"), "{}", r);
}

#[test]
fn test_empty_workflow_succeeds() {
    let dir = TempDir::new().unwrap();
    let file = write_workflow(dir.path(), "empty.yaml", "metadata:\n  name: Nothing\nworkflow: []\n");

    let r = ramjam(&["run", file.to_str().unwrap()]);
    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r);
    assert!(r.contains("All steps were run successfully"), "{}", r);
}

#[test]
fn test_completions() {
    let r = ramjam(&["completions", "bash"]);
    assert_eq!(r.exit_status, ExitStatus::Success);
    assert!(r.contains("ramjam"), "{}", r);
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let env = MockEnvironment::new();
    env.write_config("[defaults\n");

    let dir = TempDir::new().unwrap();
    let file = write_workflow(dir.path(), "empty.yaml", "workflow: []\n");

    let r = ramjam_with_env(&["run", file.to_str().unwrap()], &env);
    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r);
    assert!(r.stderr.contains("Warning: Failed to load config"), "{}", r);
}

#[tokio::test]
async fn test_config_verbose_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let env = MockEnvironment::new();
    env.write_config("[defaults]\nverbose = true\ntimeout = 5\n");

    let dir = TempDir::new().unwrap();
    let file = write_workflow(
        dir.path(),
        "ping.yaml",
        &format!("config:\n  base_url: {}\nworkflow:\n  - step: ping\n    request:\n      url: /ping\n", server.uri()),
    );

    let r = ramjam_with_env(&["run", file.to_str().unwrap()], &env);
    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r);
    assert!(r.contains("[ping.yaml] Executing step: ping"), "{}", r);
}

#[tokio::test]
async fn test_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .and(header("user-agent", "ramjam-cli"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-served-by", "mock")
                .set_body_json(json!({"hello": "world"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/hello", server.uri());

    let r = ramjam(&["get", &url]);
    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r);
    assert!(r.contains("Status: 200 OK"), "{}", r);
    assert!(r.contains("Status Code: 200"), "{}", r);
    assert!(r.contains("\nResponse Body:\n"), "{}", r);
    assert!(r.contains(r#"{"hello":"world"}"#), "{}", r);
    assert!(!r.contains("x-served-by"), "{}", r);

    let verbose = ramjam(&["get", &url, "-v", "--timeout", "3"]);
    assert!(verbose.contains(&format!("Sending GET request to: {}", url)), "{}", verbose);
    assert!(verbose.contains("Timeout: 3 seconds"), "{}", verbose);
    assert!(verbose.contains("x-served-by: mock"), "{}", verbose);
}

#[test]
fn test_get_invalid_url() {
    let r = ramjam(&["get", "not a url"]);
    assert_eq!(r.exit_status, ExitStatus::Error);
    assert!(r.stderr.contains("Error: URL parse error"), "{}", r);
}
