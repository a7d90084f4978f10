//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_musclelog"))
        .args(args)
        .env("MUSCLELOG_DATA_DIR", data_dir.path())
        .env_remove("MUSCLELOG_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Run a CLI command with `input` on stdin and return (exit code, stdout).
fn run_cli_with_input(data_dir: &TempDir, args: &[&str], input: &str) -> (i32, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_musclelog"))
        .args(args)
        .env("MUSCLELOG_DATA_DIR", data_dir.path())
        .env_remove("MUSCLELOG_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for CLI command");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    (output.status.code().unwrap_or(-1), stdout)
}

fn event_types(events: &[serde_json::Value]) -> Vec<&str> {
    events.iter().map(|e| e["type"].as_str().unwrap()).collect()
}

/// Parse one JSON value per non-empty stdout line.
fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("line is not JSON"))
        .collect()
}

#[test]
fn test_record_show_empty_day() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["record", "show", "--date", "2024-01-01"]);
    assert_eq!(code, 0);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["date"], "2024-01-01");
    assert_eq!(record["stamps"], serde_json::json!([]));
    assert_eq!(record["memo"], "");
}

#[test]
fn test_stamp_toggle_persists() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&dir, &["record", "stamp", "chest", "--date", "2024-01-01"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(&dir, &["record", "show", "--date", "2024-01-01"]);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["stamps"], serde_json::json!(["chest"]));

    run_cli(&dir, &["record", "stamp", "CHEST", "--date", "2024-01-01"]);
    let (_, stdout, _) = run_cli(&dir, &["record", "show", "--date", "2024-01-01"]);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["stamps"], serde_json::json!([]));
}

#[test]
fn test_weight_series_skips_invalid() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["record", "weight", "72", "--date", "2024-01-05"]);
    run_cli(&dir, &["record", "weight", "70", "--date", "2024-01-01"]);
    run_cli(&dir, &["record", "weight", "abc", "--date", "2024-01-03"]);

    let (code, stdout, _) = run_cli(&dir, &["weight", "series", "--json"]);
    assert_eq!(code, 0);
    let series: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        series,
        serde_json::json!([
            {"date": "2024-01-01", "weight": 70.0},
            {"date": "2024-01-05", "weight": 72.0}
        ])
    );

    let (code, stdout, _) = run_cli(&dir, &["weight", "chart"]);
    assert_eq!(code, 0);
    assert!(stdout.contains('*'));
}

#[test]
fn test_memo_may_start_with_hyphen() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(
        &dir,
        &["record", "memo", "--date", "2024-01-01", "- 5x5 squats"],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    let (_, stdout, _) = run_cli(&dir, &["record", "show", "--date", "2024-01-01"]);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["memo"], "- 5x5 squats");
}

#[test]
fn test_invalid_date_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["record", "show", "--date", "2024-13-01"]);
    assert_ne!(code, 0);
    assert!(!stderr.is_empty());
}

#[test]
fn test_unknown_folder_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["folder", "rename", "nope", "Legs"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["config", "get", "timer.default_preset_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1");

    let (code, _, _) = run_cli(&dir, &["config", "set", "calendar.default_view", "month"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(&dir, &["config", "get", "calendar.default_view"]);
    assert_eq!(stdout.trim(), "month");

    let (code, _, _) = run_cli(&dir, &["config", "set", "timer.nope", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_folder_list_and_add() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["folder", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Chest technique"));
    assert!(stdout.contains("Back routine"));

    let (code, _, _) = run_cli(&dir, &["folder", "add", "Leg day"]);
    assert_eq!(code, 0);
    run_cli(&dir, &["folder", "link", "f2", "https://youtu.be/row"]);

    let (_, stdout, _) = run_cli(&dir, &["folder", "list", "--json"]);
    let folders: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let folders = folders.as_array().unwrap();
    assert_eq!(folders.len(), 3);
    assert_eq!(folders[2]["name"], "Leg day");
    assert_eq!(folders[1]["items"][0]["type"], "youtube");
}

#[test]
fn test_countdown_zero_finishes() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["timer", "countdown", "--seconds", "0", "--quiet"]);
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    let types: Vec<_> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["CountdownStarted", "CountdownFinished", "TimerSnapshot"]);
    assert_eq!(events[2]["display"], "00:00.00");
    assert_eq!(events[2]["finished"], true);
}

#[test]
fn test_countdown_rejects_unknown_preset() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["timer", "countdown", "--preset", "7"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("preset"));
}

#[test]
fn test_countdown_reset_from_input() {
    let dir = TempDir::new().unwrap();
    let args = ["timer", "countdown", "--seconds", "60", "--quiet"];
    let (code, stdout) = run_cli_with_input(&dir, &args, "r\nq\n");
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(event_types(&events), vec!["CountdownStarted", "CountdownReset", "TimerSnapshot"]);
    assert_eq!(events[2]["value_ms"], 60_000);
    assert_eq!(events[2]["running"], false);
}

#[test]
fn test_countdown_preset_from_input() {
    let dir = TempDir::new().unwrap();
    let args = ["timer", "countdown", "--seconds", "60", "--quiet"];
    let (code, stdout) = run_cli_with_input(&dir, &args, "3\n7\nq\n");
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(
        event_types(&events),
        vec!["CountdownStarted", "CountdownConfigured", "TimerSnapshot"]
    );
    assert_eq!(events[1]["duration_ms"], 180_000);
    assert_eq!(events[2]["display"], "03:00.00");
}

#[test]
fn test_countdown_pause_and_resume_from_input() {
    let dir = TempDir::new().unwrap();
    let args = ["timer", "countdown", "--seconds", "60", "--quiet"];
    let (code, stdout) = run_cli_with_input(&dir, &args, "p\np\nq\n");
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(
        event_types(&events),
        vec![
            "CountdownStarted",
            "CountdownPaused",
            "CountdownStarted",
            "CountdownPaused",
            "TimerSnapshot"
        ]
    );
    assert_eq!(events[2]["restarted"], false);
}

#[test]
fn test_stopwatch_runs_until_quit() {
    let dir = TempDir::new().unwrap();
    let (code, stdout) = run_cli_with_input(&dir, &["timer", "stopwatch", "--quiet"], "q\n");
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(
        event_types(&events),
        vec!["StopwatchStarted", "StopwatchPaused", "TimerSnapshot"]
    );
}

#[test]
fn test_stopwatch_zero_seconds() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["timer", "stopwatch", "--seconds", "0", "--quiet"]);
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(events.last().unwrap()["type"], "TimerSnapshot");
    assert_eq!(events.last().unwrap()["running"], false);
}

#[test]
fn test_calendar_week() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["record", "stamp", "legs", "--date", "2024-01-03"]);
    let (code, stdout, _) = run_cli(&dir, &["calendar", "--date", "2024-01-03", "--view", "week"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("January 2024"));
    assert!(stdout.contains("[03]"));
    assert!(stdout.contains('L'));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("musclelog"));
}
