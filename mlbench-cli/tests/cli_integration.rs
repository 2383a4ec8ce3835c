//! Integration tests for the mlbench CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

#[test]
fn test_score_text_output() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("predictions.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ACC: "))
        .stdout(predicate::str::contains("MCC: "))
        .stdout(predicate::str::contains("Information: "))
        .stdout(predicate::str::contains("MSE: 0.2"));
}

#[test]
fn test_score_json_output() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    let output = cmd
        .arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("truth.csv"))
        .arg("-f")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["ACC"], 1.0);
    assert_eq!(record["Precision"], 1.0);
    assert_eq!(record["MSE"], 0.0);
}

#[test]
fn test_score_markdown_output() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg(fixture_path("truth.csv"))
        .arg("-p")
        .arg(fixture_path("predictions.csv"))
        .arg("-r")
        .arg("-f")
        .arg("markdown");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("| Metric | Value |"))
        .stdout(predicate::str::contains("| MSE | 0.2 |"))
        .stdout(predicate::str::contains("ACC").not());
}

#[test]
fn test_score_missing_file() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("score")
        .arg("-t")
        .arg("nonexistent.csv")
        .arg("-p")
        .arg(fixture_path("predictions.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent.csv"));
}

#[test]
fn test_timers_from_file() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("timers")
        .arg("-i")
        .arg(fixture_path("program_timers.txt"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("loading_data: 0.5"))
        .stdout(predicate::str::contains("total_time: 2.75"));
}

#[test]
fn test_timers_from_stdin() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("timers")
        .arg("-f")
        .arg("json")
        .write_stdin("weka.classifiers.trees.J48\ntesting: 0,125s\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"testing\": 0.125"));
}

#[test]
fn test_resolve_converts_to_arff() {
    let temp_dir = TempDir::new().unwrap();
    let train = temp_dir.path().join("iris_train.csv");
    fs::copy(fixture_path("train.csv"), &train).unwrap();

    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("resolve").arg("-d").arg(&train).arg("-a").arg("arff");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("iris_train.arff"));

    let arff = fs::read_to_string(temp_dir.path().join("iris_train.arff")).unwrap();
    assert!(arff.starts_with("@relation iris\n"));
    assert!(arff.contains("@attribute iris_train_dim2 NUMERIC"));
    assert!(arff.ends_with("5.1,3.5,1\n4.9,3.0,1\n6.2,2.9,2\n"));
}

#[test]
fn test_resolve_keeps_accepted_format() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("resolve")
        .arg("-d")
        .arg(fixture_path("train.csv"))
        .arg("-a")
        .arg("csv,arff");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("train.csv"));
}

#[test]
fn test_resolve_missing_dataset() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("resolve").arg("-d").arg("missing.csv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn test_sweep_expands_first_directive() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    let output = cmd
        .arg("sweep")
        .arg("-p")
        .arg(fixture_path("params.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let sets: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(sets.len(), 4);
    assert_eq!(sets[0]["C"], 1.0);
    assert_eq!(sets[2]["C"], 3.0);
    assert_eq!(sets[2]["kernel"], "rbf");
    assert_eq!(sets[3]["C"], 10);
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("timers"))
        .stdout(predicate::str::contains("sweep"));
}

#[cfg(unix)]
#[test]
fn test_run_method_definition() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::copy(fixture_path("train.csv"), dir.join("train.csv")).unwrap();
    fs::copy(fixture_path("train.csv"), dir.join("test.csv")).unwrap();
    fs::copy(fixture_path("truth.csv"), dir.join("labels.csv")).unwrap();

    let config = dir.join("method.toml");
    fs::write(
        &config,
        r#"
name = "copycat"
shell = "cp {labels} {predictions}; printf 'Program timers:\n  loading_data: 0.5s\n  total_time: 2.5s\n'"
datasets = ["train.csv", "test.csv", "labels.csv"]
predictions = "predictions.csv"

[run]
timeout = 30
working_dir = "."
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    let output = cmd
        .arg("run")
        .arg("-c")
        .arg(&config)
        .arg("-f")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["runtime"], 2.0);
    assert_eq!(record["ACC"], 1.0);
    assert_eq!(record["MSE"], 0.0);
}

#[cfg(unix)]
#[test]
fn test_run_timeout() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::copy(fixture_path("train.csv"), dir.join("train.csv")).unwrap();

    let config = dir.join("method.toml");
    fs::write(
        &config,
        r#"
name = "sleeper"
command = ["sleep", "10"]
datasets = ["train.csv"]
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mlbench").unwrap();
    cmd.arg("run").arg("-c").arg(&config).arg("-t").arg("1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}
