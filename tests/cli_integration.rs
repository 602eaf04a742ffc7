// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the jobgraph CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const JOBS: &str = r#"{
    "root_url": "http://ci.example.com",
    "jobs": [
        {
            "full_name": "build",
            "build_trigger": { "child_projects": "test, , package", "threshold": "success" }
        },
        { "full_name": "test" },
        { "full_name": "package", "copy_artifacts": ["build"] },
        { "full_name": "team/deploy", "trigger_builders": [{ "projects": "/team/smoke" }] },
        { "full_name": "team/smoke", "depends_on": ["/package"] },
        { "full_name": "solo" }
    ]
}"#;

/// Data directory holding the sample jobs
fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("jobs.json"), JOBS).unwrap();
    dir
}

/// jobgraph with the given data directory and an isolated config location
fn jobgraph(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jobgraph").unwrap();
    cmd.env("JOBGRAPH_DATA_DIR", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("HOME", dir.path())
        .env_remove("RUST_LOG")
        .env_remove("JOBGRAPH_CONFIG");
    cmd
}

#[test]
fn test_graph_gv_to_stdout() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["graph", "build"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph {"))
        .stdout(predicate::str::contains("\"build\" -> \"test\" [ color=black ] ;"))
        .stdout(predicate::str::contains("\"build\" -> \"package\" [ color=lightblue ] ;"))
        .stdout(predicate::str::contains("href=\"http://ci.example.com/job/build/\""))
        .stdout(predicate::str::contains("\"solo\"").not());
}

#[test]
fn test_graph_all_jobs_has_standalone() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["graph"])
        .assert()
        .success()
        .stdout(predicate::str::contains("subgraph clusterStandalone {\n\"solo\""));
}

#[test]
fn test_graph_json_to_file() {
    let dir = data_dir();
    let out = dir.path().join("graph.json");
    jobgraph(&dir)
        .args(["graph", "-f", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let clusters = doc["clusters"].as_array().unwrap();
    let last = clusters.last().unwrap();
    assert_eq!(last["hSize"].as_f64(), Some(700.0));
    assert_eq!(last["nodes"][0]["fullName"], "solo");
    assert!(doc["edges"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["from"] == "build" && e["to"] == "test" && e["type"] == "trigger"));
}

#[test]
fn test_subproject_rows() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["graph", "team/deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shape=\"Mrecord\""))
        .stdout(predicate::str::contains("bgcolor=\"#F0F0F0\">team/smoke</td>"));
}

#[test]
fn test_folder_seeds_all_its_jobs() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["graph", "team"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"team/deploy\""))
        .stdout(predicate::str::contains("\"team/smoke\" [label="))
        .stdout(predicate::str::contains("\"solo\"").not());
}

#[test]
fn test_unknown_format_rejected() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["graph", "-f", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported output format"));
}

#[test]
fn test_image_with_graphviz_disabled() {
    let dir = data_dir();
    jobgraph(&dir)
        .env("JOBGRAPH_GRAPHVIZ_ENABLED", "false")
        .args(["graph", "-f", "png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Graphviz is disabled"));
}

#[test]
fn test_legend() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["legend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("subgraph clusterLegend"))
        .stdout(predicate::str::contains("Sub-Project"));

    jobgraph(&dir)
        .args(["legend", "-f", "json"])
        .assert()
        .failure();
}

#[test]
fn test_levels_json() {
    let dir = data_dir();
    let output = jobgraph(&dir)
        .args(["--json", "levels", "build"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let level_of = |job: &str| {
        entries
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["job"] == job)
            .map(|e| e["level"].as_u64().unwrap())
    };
    assert_eq!(level_of("build"), Some(1));
    assert_eq!(level_of("package"), Some(2));
    assert_eq!(level_of("team/smoke"), Some(3));
}

#[test]
fn test_edge_lifecycle() {
    let dir = data_dir();

    jobgraph(&dir)
        .args(["edge", "add", "--from", "test", "--to", "solo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created trigger: test -> solo"));

    let saved = fs::read_to_string(dir.path().join("jobs.json")).unwrap();
    assert!(saved.contains("\"child_projects\": \"solo\""));

    jobgraph(&dir)
        .args(["--no-color", "edge", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test --[trigger]--> solo"));

    jobgraph(&dir)
        .args(["edge", "remove", "--from", "test", "--to", "solo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 trigger(s)"));

    jobgraph(&dir)
        .args(["edge", "remove", "--from", "test", "--to", "solo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No trigger found"));
}

#[test]
fn test_edge_unknown_job() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["edge", "add", "--from", "test", "--to", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("job not found: ghost"));
}

#[test]
fn test_request_routes() {
    let dir = data_dir();

    jobgraph(&dir)
        .args(["request", "GET", "/graph.gv", "--job", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"build\" -> \"test\""));

    jobgraph(&dir)
        .args(["request", "GET", "/nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("501"));

    jobgraph(&dir)
        .args(["request", "PUT", "/edge/test/solo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("403"));

    jobgraph(&dir)
        .env("JOBGRAPH_EDIT_ENABLED", "true")
        .args(["request", "PUT", "/edge/team%2Fsmoke/solo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    let saved = fs::read_to_string(dir.path().join("jobs.json")).unwrap();
    assert!(saved.contains("\"child_projects\": \"/solo\""));
}

#[test]
fn test_config_file_and_show() {
    let dir = data_dir();
    let config = dir.path().join("jobgraph.toml");
    fs::write(&config, "rank_direction = \"LR\"\n").unwrap();

    jobgraph(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rank_direction"])
        .assert()
        .success()
        .stdout("LR\n");

    jobgraph(&dir)
        .arg("--config")
        .arg(&config)
        .args(["graph", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rankdir=LR;"));

    jobgraph(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edit_enabled = false"));
}

#[test]
fn test_missing_registry_is_empty() {
    let dir = TempDir::new().unwrap();
    jobgraph(&dir)
        .args(["graph"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph {"))
        .stderr(predicate::str::contains("No jobs defined"));
}

#[test]
fn test_completions() {
    let dir = data_dir();
    jobgraph(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jobgraph"));
}
