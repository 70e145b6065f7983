use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_duelsim")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("duelsim-{name}-{stamp}.{extension}"))
}

fn write_request(name: &str, extension: &str, contents: &str) -> PathBuf {
    let path = unique_temp_path(name, extension);
    fs::write(&path, contents).expect("request file should be written");
    path
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: duelsim"));
}

#[test]
fn simulate_without_a_path_is_a_usage_error() {
    let output = Command::new(bin())
        .arg("simulate")
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: duelsim simulate"));
}

#[test]
fn simulate_command_runs_a_json_request() {
    let path = write_request(
        "simulate",
        "json",
        r#"{ "attacker": { "max_life": 700 }, "defender": { "max_life": 700 }, "trials": 40 }"#,
    );
    let output = Command::new(bin())
        .arg("simulate")
        .arg(&path)
        .args(["--seed", "12"])
        .output()
        .expect("simulate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("simulate should emit json");
    assert_eq!(payload["seed"], 12);
    assert_eq!(payload["summary"]["trials"], 40);
    assert!(payload["summary"]["attacker_win_rate"].is_number());
}

#[test]
fn trials_flag_overrides_the_request_and_writes_csv() {
    let path = write_request("csv", "json", r#"{ "trials": 1000, "seed": 3 }"#);
    let csv_path = unique_temp_path("summary", "csv");
    let output = Command::new(bin())
        .arg("simulate")
        .arg(&path)
        .args(["--trials", "15", "--csv"])
        .arg(&csv_path)
        .output()
        .expect("simulate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("simulate should emit json");
    assert_eq!(payload["summary"]["trials"], 15);

    let csv = fs::read_to_string(&csv_path).expect("csv should be written");
    let _ = fs::remove_file(&csv_path);
    let mut lines = csv.lines();
    assert!(lines.next().is_some_and(|line| line.starts_with("generated_at,")));
    assert_eq!(lines.next(), Some("side,life,count"));
    assert!(csv.lines().any(|line| line == "log"));
}

#[test]
fn invalid_trials_flag_is_a_usage_error() {
    let path = write_request("bad-flag", "json", "{}");
    let output = Command::new(bin())
        .arg("simulate")
        .arg(&path)
        .args(["--trials", "many"])
        .output()
        .expect("simulate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid --trials"));
}

#[test]
fn validate_command_reads_yaml_and_reports_defaults() {
    let path = write_request(
        "validate",
        "yaml",
        "attacker:\n  name: Alice\n  weapons:\n    primary:\n      name: Rifle\n      category: rifle\n      damage: 50\n      clip_size: 30\n      clips: 2\ntrials: 250\nseed: 9\n",
    );
    let output = Command::new(bin())
        .arg("validate")
        .arg(&path)
        .output()
        .expect("validate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));
    assert!(stdout.contains("trials: 250"));
    assert!(stdout.contains("seed: 9"));
    assert!(!stdout.contains("attacker 'Alice': primary defaults"));
    assert!(stdout.contains("attacker 'Alice': secondary defaults to Fists"));
}

#[test]
fn simulate_command_rejects_zero_max_life() {
    let path = write_request("lifeless", "json", r#"{ "defender": { "max_life": 0 } }"#);
    let output = Command::new(bin())
        .arg("simulate")
        .arg(&path)
        .output()
        .expect("simulate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("defender.max_life"));
}

#[test]
fn validate_command_rejects_out_of_range_trials() {
    let path = write_request("invalid", "json", r#"{ "trials": 0 }"#);
    let output = Command::new(bin())
        .arg("validate")
        .arg(&path)
        .output()
        .expect("validate should run");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("validation failed"));
}
