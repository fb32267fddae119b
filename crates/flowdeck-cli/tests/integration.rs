//! Integration tests for the `flowdeck` binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;

/// Helper to get the path to the `flowdeck` binary built by cargo.
fn flowdeck_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flowdeck"))
}

const CONFIG: &str = r#"{
    "voice_presets": [
        {"name": "Normal", "values": {"pitch": 0.5, "reverb": 0.25, "echo": 0.0}},
        {"name": "Deep Echo", "values": {"pitch": 0.25, "reverb": 0.5, "echo": 0.5}}
    ],
    "audio_mixer_groups": [
        {"name": "Music", "apps": ["Spotify.exe"]}
    ],
    "stream_deck_buttons": [
        {"label": "OBS", "executable": "obs64.exe"}
    ]
}"#;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, content).unwrap();
    path
}

/// Run `flowdeck run --no-audio`, feed it `input` on stdin, return stdout
/// lines.
fn run_session(dir: &Path, input: &str) -> (Vec<String>, PathBuf) {
    let config = write_config(dir, CONFIG);
    let state = dir.join("state").join("fx_state.json");

    let mut child = flowdeck_bin()
        .args(["run", "--no-audio", "--workers", "1", "--config"])
        .arg(&config)
        .arg("--state-file")
        .arg(&state)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start flowdeck run");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "flowdeck run failed");

    let lines = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    (lines, state)
}

#[test]
fn cli_check_accepts_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);

    let output = flowdeck_bin()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("failed to run flowdeck check");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("OK"));
    assert!(stdout.contains("2 voice preset(s)"));
}

#[test]
fn cli_check_rejects_out_of_range_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{"voice_presets": [
            {"name": "Bad", "values": {"pitch": 1.5}},
            {"name": "", "values": {}}
        ]}"#,
    );

    let output = flowdeck_bin()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("failed to run flowdeck check");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 problem(s)"), "got: {stdout}");
}

#[test]
fn cli_presets_lists_mapped_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);

    let output = flowdeck_bin()
        .arg("presets")
        .arg("--config")
        .arg(&config)
        .arg("--state-file")
        .arg(dir.path().join("missing.json"))
        .output()
        .expect("failed to run flowdeck presets");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Normal"));
    assert!(stdout.contains("Deep Echo"));
    // pitch 0.25 → -6 semitones, echo 0.5 → 0.25 s
    assert!(stdout.contains("-6.0"));
    assert!(stdout.contains("0.250"));
}

#[test]
fn cli_run_answers_commands_and_queries() {
    let dir = tempfile::tempdir().unwrap();
    let input = concat!(
        r#"{"action": "set_voice_fx", "fx_name": "echo", "value": 0.75}"#,
        "\n",
        r#"{"is_muted": true}"#,
        "\n",
        "config\n",
        "quit\n",
    );
    let (lines, state) = run_session(dir.path(), input);
    assert_eq!(lines.len(), 3, "got: {lines:?}");

    let ack: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(ack["status"], "success");
    assert_eq!(ack["action_triggered"], "set_voice_fx");

    let err: Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(err["status"], "error");
    assert_eq!(err["message"], "Invalid request");

    let config: Value = serde_json::from_str(&lines[2]).unwrap();
    assert_eq!(config["voice_presets"][1]["name"], "Deep Echo");

    // The queue drains before exit, so the write has been persisted.
    let persisted: Value =
        serde_json::from_str(&std::fs::read_to_string(state).unwrap()).unwrap();
    assert_eq!(persisted["echo"], 0.75);
    assert_eq!(persisted["reverb"], 0.25);
}

#[test]
fn cli_run_reports_state() {
    let dir = tempfile::tempdir().unwrap();
    let (lines, _) = run_session(dir.path(), "state\n");
    assert_eq!(lines.len(), 1);

    let state: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(state["voice"]["active_preset"], 0);
    assert_eq!(state["voice"]["fx"]["reverb"], 0.25);
    assert_eq!(state["audio"]["groups"][0]["level"], -1.0);
}
