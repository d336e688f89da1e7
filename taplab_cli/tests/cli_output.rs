use std::{
    env,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn drill_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("drills").join(name)
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("taplab_cli_{tag}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn schedule_prints_summary_and_timeline() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let drill = drill_path("quarters_120.json");

    let output = Command::new(exe)
        .args(["schedule", drill.to_str().unwrap(), "--start", "1000"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("Quarter Notes - 120 BPM (quarters_120)"));
    assert!(stdout.contains("4th Notes | Burst | 2 bars, 4s"));
    assert!(stdout.contains("1000.0"));
    assert!(stdout.contains("4500.0"));
    assert!(stdout.contains("8 notes"));
    assert!(stdout.contains("span: 1000.0 - 4500.0 ms"));
    assert!(stdout.contains("length: 4000.0 ms"));
}

#[test]
fn schedule_invalid_bpm_is_reported_with_code() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let dir = scratch_dir("bad_bpm");
    let input = dir.join("drill.json");

    let text = fs::read_to_string(drill_path("quarters_120.json"))
        .unwrap()
        .replace("\"bpm\": 120.0", "\"bpm\": 0.0");
    fs::write(&input, text).unwrap();

    let output = Command::new(exe)
        .args(["schedule", input.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: schedule failed: "));
    assert!(stderr.contains("Caused by:"));
    assert!(stderr.contains("E3003"));
}

#[test]
fn schedule_missing_input_file_is_reported() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let missing = scratch_dir("missing").join("nope.json");
    let _ = fs::remove_file(&missing);

    let output = Command::new(exe)
        .args(["schedule", missing.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: failed to read drill:"));
}

#[test]
fn replay_prints_judgments_and_record() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let dir = scratch_dir("replay");
    let script = dir.join("taps.txt");
    // Notes at 0, 500, ..., 3500. Skip the third, hit the fourth late.
    fs::write(&script, "0 z\n510 x\n# 1000 skipped\n1560 z\n").unwrap();

    let output = Command::new(exe)
        .args([
            "replay",
            drill_path("quarters_120.json").to_str().unwrap(),
            script.to_str().unwrap(),
            "--user",
            "tester",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("| HIT   | #0 Perfect +0.0ms left"));
    assert!(stdout.contains("| HIT   | #1 Perfect +10.0ms right"));
    assert!(stdout.contains("| HIT   | #3 Good +60.0ms left"));
    assert!(stdout.contains("| MISS  | #2"));
    assert!(stdout.contains("status: Finished"));

    let json_start = stdout.find('{').unwrap();
    let record: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(record["userId"], "tester");
    assert_eq!(record["drillId"], "quarters_120");
    assert_eq!(record["hit300"], 2);
    assert_eq!(record["hit100"], 1);
    assert_eq!(record["missCount"], 5);
}

#[test]
fn replay_rejects_bad_script() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let dir = scratch_dir("bad_script");
    let script = dir.join("taps.txt");
    fs::write(&script, "100 z\n200 space\n").unwrap();

    let output = Command::new(exe)
        .args([
            "replay",
            drill_path("quarters_120.json").to_str().unwrap(),
            script.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: invalid script:"));
    assert!(stderr.contains("unknown key \"space\" (line 2)"));
}

#[test]
fn analyze_prints_json_for_tap_log() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let dir = scratch_dir("analyze");
    let log = dir.join("taps.json");
    let taps: Vec<serde_json::Value> = (0..12)
        .map(|i| {
            serde_json::json!({
                "index": i,
                "offset_ms": if i % 2 == 0 { 4.0 } else { -6.0 },
                "channel": if i % 2 == 0 { "left" } else { "right" },
                "timestamp_ms": 1000.0 + 250.0 * i as f64,
            })
        })
        .collect();
    fs::write(&log, serde_json::to_string(&taps).unwrap()).unwrap();

    let output = Command::new(exe)
        .args(["analyze", log.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["total_taps"], 12);
    assert_eq!(v["early_ratio"], 0.5);
    assert_eq!(v["imbalance"], 10.0);
    // Too few taps to judge galloping.
    assert_eq!(v["galloping_risk"], 0);
}

#[test]
fn analyze_empty_log_fails() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let dir = scratch_dir("analyze_empty");
    let log = dir.join("taps.json");
    fs::write(&log, "[]").unwrap();

    let output = Command::new(exe)
        .args(["analyze", log.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("Error: tap log is empty:"));
}

#[test]
fn config_window_preset_tightens_grades() {
    let exe = env!("CARGO_BIN_EXE_taplab");
    let dir = scratch_dir("config");
    let config = dir.join("config.json");
    fs::write(&config, r#"{ "matcher": { "window_mode": "preset" } }"#).unwrap();
    let script = dir.join("taps.txt");
    fs::write(&script, "20 z\n").unwrap();

    let output = Command::new(exe)
        .args([
            "--config",
            config.to_str().unwrap(),
            "replay",
            drill_path("quarters_120.json").to_str().unwrap(),
            script.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    // 20 ms is PERFECT at OD 8 but only GOOD with the 16/34/50 preset.
    assert!(stdout.contains("| HIT   | #0 Good +20.0ms left"));
}

#[test]
fn help_mentions_subcommands() {
    let exe = env!("CARGO_BIN_EXE_taplab");

    let output = Command::new(exe).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("schedule"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("replay"));
}
