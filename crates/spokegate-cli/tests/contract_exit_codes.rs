//! Exit-code contract for the `spokegate` binary.
//!
//! 0 = allowed / valid, 1 = requester-side rejection, 2 = platform-side
//! configuration problem. Pipelines branch on these values.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn spokegate() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_spokegate"));
    cmd.env_remove("SPOKEGATE_BASE_DIR")
        .env_remove("SPOKEGATE_SPOKE_DIR")
        .env_remove("AIRFLOW_BASE_URL")
        .env_remove("AIRFLOW_USERNAME")
        .env_remove("AIRFLOW_PASSWORD")
        .env_remove("AIRFLOW_TIMEOUT");
    cmd
}

fn platform_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let groups = dir.path().join("ad_groups");
    std::fs::create_dir_all(&groups).unwrap();
    std::fs::write(
        groups.join("prod.yaml"),
        "groups:\n  model_publishers_prod:\n    members: [alice]\n",
    )
    .unwrap();
    std::fs::write(
        groups.join("dev.yaml"),
        "groups:\n  data_science_dev:\n    members: [dana]\n",
    )
    .unwrap();
    dir
}

fn spoke_repo(manifest: &str, dag_files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("project.json"), manifest).unwrap();
    let dags = dir.path().join("dags");
    std::fs::create_dir_all(&dags).unwrap();
    for f in dag_files {
        std::fs::write(dags.join(f), "# dag\n").unwrap();
    }
    dir
}

const MANIFEST: &str =
    r#"{"project_name":"p","team":"t","dag_path":"dags","allowed_envs":["dev"]}"#;

fn authz(base: &Path, env: &str, user: &str) -> Command {
    let mut cmd = spokegate();
    cmd.args(["authz", "--env", env, "--user", user, "--base-dir"])
        .arg(base);
    cmd
}

fn validate_project(spoke: &Path, env: &str) -> Command {
    let mut cmd = spokegate();
    cmd.args(["validate-project", "--env", env, "--spoke-dir"])
        .arg(spoke);
    cmd
}

#[test]
fn authz_allow_exits_0() {
    let repo = platform_repo();
    authz(repo.path(), "prod", "alice")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("[authz] ALLOW"));
}

#[test]
fn authz_env_is_case_insensitive() {
    let repo = platform_repo();
    authz(repo.path(), "PROD", "alice").assert().code(0);
}

#[test]
fn authz_deny_exits_1() {
    let repo = platform_repo();
    authz(repo.path(), "prod", "bob")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[authz] DENY"));
}

#[test]
fn authz_missing_group_file_exits_2() {
    let repo = platform_repo();
    authz(repo.path(), "stage", "alice")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("AD group config not found"));
}

#[test]
fn authz_unknown_action_exits_2() {
    let repo = platform_repo();
    authz(repo.path(), "prod", "alice")
        .args(["--action", "deploy_dags"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Did you mean 'deploy_dag'?"));
}

#[test]
fn authz_unknown_env_exits_2() {
    let repo = platform_repo();
    authz(repo.path(), "qa", "alice").assert().code(2);
}

#[test]
fn authz_json_output() {
    let repo = platform_repo();
    let output = authz(repo.path(), "dev", "dana")
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let doc: Value = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(doc["decision"], "ALLOW");
    assert_eq!(doc["matched_group"], "data_science_dev");
    assert_eq!(doc["exit_code"], 0);
}

#[test]
fn authz_base_dir_from_env() {
    let repo = platform_repo();
    spokegate()
        .env("SPOKEGATE_BASE_DIR", repo.path())
        .args(["authz", "--env", "prod", "--user", "alice"])
        .assert()
        .code(0);
}

#[test]
fn validate_valid_exits_0() {
    let spoke = spoke_repo(MANIFEST, &["etl.py"]);
    validate_project(spoke.path(), "dev")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("etl.py"));
}

#[test]
fn validate_env_not_allowed_exits_1() {
    let spoke = spoke_repo(MANIFEST, &["etl.py"]);
    validate_project(spoke.path(), "prod")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not allowed"));
}

#[test]
fn validate_missing_field_exits_1() {
    let spoke = spoke_repo(
        r#"{"project_name":"p","dag_path":"nope","allowed_envs":["dev"]}"#,
        &[],
    );
    validate_project(spoke.path(), "prod")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing required field 'team'"));
}

#[test]
fn validate_no_definitions_exits_1() {
    let spoke = spoke_repo(MANIFEST, &["notes.txt"]);
    validate_project(spoke.path(), "dev").assert().code(1);
}

#[test]
fn validate_path_not_found_exits_2() {
    let spoke = spoke_repo(
        r#"{"project_name":"p","team":"t","dag_path":"missing","allowed_envs":["dev"]}"#,
        &[],
    );
    validate_project(spoke.path(), "dev").assert().code(2);
}

#[test]
fn validate_dag_path_outside_project_exits_2() {
    let spoke = spoke_repo(
        r#"{"project_name":"p","team":"t","dag_path":"/etc","allowed_envs":["dev"]}"#,
        &["etl.py"],
    );
    validate_project(spoke.path(), "dev")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dag_path must be relative"));
}

#[test]
fn validate_missing_manifest_exits_2() {
    let dir = TempDir::new().unwrap();
    validate_project(dir.path(), "dev")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("project.json not found"));
}

#[test]
fn validate_invalid_json_exits_2() {
    let spoke = spoke_repo("{ broken", &["etl.py"]);
    validate_project(spoke.path(), "dev").assert().code(2);
}

#[test]
fn validate_json_output() {
    let spoke = spoke_repo(MANIFEST, &["b.py", "a.py"]);
    let output = validate_project(spoke.path(), "dev")
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["outcome"], "VALID");
    assert_eq!(doc["dag_files"], serde_json::json!(["a.py", "b.py"]));
}

#[test]
fn trigger_without_credentials_exits_1() {
    spokegate()
        .args(["trigger", "--dag-id", "etl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("AIRFLOW_USERNAME"));
}

#[test]
fn trigger_invalid_conf_exits_1() {
    spokegate()
        .env("AIRFLOW_USERNAME", "u")
        .env("AIRFLOW_PASSWORD", "p")
        .args(["trigger", "--dag-id", "etl", "--conf-json", "{nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn trigger_unreachable_exits_1() {
    spokegate()
        .env("AIRFLOW_USERNAME", "u")
        .env("AIRFLOW_PASSWORD", "p")
        .env("AIRFLOW_TIMEOUT", "2")
        .args([
            "trigger",
            "--dag-id",
            "etl",
            "--airflow-base-url",
            "http://127.0.0.1:1",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error calling orchestrator API"));
}

#[test]
fn trigger_bad_timeout_exits_1() {
    spokegate()
        .env("AIRFLOW_USERNAME", "u")
        .env("AIRFLOW_PASSWORD", "p")
        .env("AIRFLOW_TIMEOUT", "0")
        .args(["trigger", "--dag-id", "etl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("AIRFLOW_TIMEOUT"));
}

#[tokio::test(flavor = "multi_thread")]
async fn trigger_blank_conf_submits_default_conf() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/dags/etl/dagRuns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "queued"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assert = spokegate()
        .env("AIRFLOW_USERNAME", "u")
        .env("AIRFLOW_PASSWORD", "p")
        .env("RUST_LOG", "info")
        .args(["trigger", "--dag-id", "etl", "--env", "prod", "--conf-json", ""])
        .arg("--airflow-base-url")
        .arg(mock_server.uri())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("invalid JSON").not());

    // each report line is printed once at the default log level
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_lowercase();
    assert_eq!(stderr.matches("triggering dag").count(), 1, "{stderr}");

    let received = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        body["conf"],
        serde_json::json!({"triggered_by": "jenkins", "env": "prod", "note": "self-service trigger"})
    );
}
