// CLI integration tests for check/bench/synth flows and exit codes.
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_whouses");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    parse_json(line)
}

fn run_with_stdin(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

fn sample() -> Value {
    json!({
        "schema": "who-uses-json-v1",
        "cmd": "scan",
        "term": "PHP",
        "options": {"deps_only": false, "include_venv": true, "projects_only": false},
        "results": [
            {"project": "alpha", "files": [
                {"path": "src/a.py", "matches": [{"line": 3, "column": 7}]}
            ]}
        ],
        "summary": {"projects_with_hits": 1, "files_with_hits": 1, "total_matches": 1}
    })
}

fn sample_bytes() -> Vec<u8> {
    serde_json::to_vec_pretty(&sample()).expect("encode")
}

fn metric_labels(report: &Value) -> Vec<String> {
    report["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|row| row["metric"].as_str().expect("metric label").to_string())
        .collect()
}

#[test]
fn check_prints_canonical_document() {
    let output = run_with_stdin(&["check"], &sample_bytes());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with(r#"{"schema":"who-uses-json-v1","cmd":"scan","term":"PHP","options""#));
    assert_eq!(parse_json(&stdout), sample());
}

#[test]
fn check_pretty_reads_input_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("report.json");
    std::fs::write(&path, serde_json::to_vec(&sample()).unwrap()).expect("write");

    let output = cmd()
        .args(["check", "--pretty", "--input", path.to_str().unwrap()])
        .output()
        .expect("check");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.lines().count() > 1);
    assert_eq!(parse_json(&stdout), sample());
}

#[test]
fn check_reports_validation_error_as_json() {
    let mut doc = sample();
    doc["results"][0]["files"][0]["matches"][0]["line"] = json!(0);
    let output = run_with_stdin(&["check"], &serde_json::to_vec(&doc).unwrap());
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());

    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Validation");
    assert_eq!(err["error"]["constraint"], "not_positive");
    assert_eq!(err["error"]["field"], "results[0].files[0].matches[0].line");
}

#[test]
fn check_reports_extra_field_path() {
    let mut doc = sample();
    doc["options"]["verbose"] = json!(true);
    let output = run_with_stdin(&["check"], &serde_json::to_vec(&doc).unwrap());
    assert_eq!(output.status.code(), Some(4));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["constraint"], "extra_field_forbidden");
    assert_eq!(err["error"]["field"], "options.verbose");
}

#[test]
fn check_reports_decode_error_with_offset() {
    let output = run_with_stdin(&["check"], br#"{"schema": "who-uses-json-v1",,}"#);
    assert_eq!(output.status.code(), Some(3));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Decode");
    assert_eq!(err["error"]["offset"], 30);
    assert_eq!(err["error"]["line"], 1);
    assert!(err["error"].get("constraint").is_none());
}

#[test]
fn empty_stdin_is_rejected() {
    let output = run_with_stdin(&["check"], b"  \n");
    assert_eq!(output.status.code(), Some(2));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "EmptyInput");
}

#[test]
fn missing_input_file_is_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.json");
    let output = cmd()
        .args(["check", "--input", path.to_str().unwrap()])
        .output()
        .expect("check");
    assert_eq!(output.status.code(), Some(5));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Io");
    assert!(err["error"]["causes"].as_array().is_some());
}

#[test]
fn unknown_flag_is_usage_error() {
    let output = cmd().args(["bench", "--bogus"]).output().expect("bench");
    assert_eq!(output.status.code(), Some(2));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}

#[test]
fn bench_json_report_lists_metrics_in_order() {
    let output = run_with_stdin(&["bench", "--n", "2", "--format", "json"], &sample_bytes());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));

    assert_eq!(report["name"], "whouses");
    assert_eq!(report["params"]["repetitions"], 2);
    assert_eq!(report["params"]["sizing"], "manual");
    assert!(report["ts"].as_str().unwrap().ends_with('Z'));
    assert_eq!(
        metric_labels(&report),
        [
            "input_bytes",
            "bind_slice",
            "encode",
            "bind_slice_rate",
            "output_bytes",
            "decode:serde_json",
            "decode:simd-json",
            "bind_value:serde_json",
            "bind_value:simd-json",
            "bind_value_rate",
        ]
    );
    assert_eq!(report["results"][0]["bytes"], sample_bytes().len());
    assert_eq!(report["results"][9]["iterations"], 200);
}

#[test]
fn bench_table_without_breakdown() {
    let output = run_with_stdin(&["bench", "--n", "1", "--no-breakdown"], &sample_bytes());
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("bind_slice_rate"));
    assert!(stdout.contains("(N=1, manual)"));
    assert!(!stdout.contains("-- breakdown --"));
    assert!(!stdout.contains("decode:"));
}

#[test]
fn bench_aborts_on_invalid_document() {
    let mut doc = sample();
    doc["schema"] = json!("who-uses-json-v1-beta");
    let output = run_with_stdin(&["bench", "--n", "1"], &serde_json::to_vec(&doc).unwrap());
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["constraint"], "literal_mismatch");
    assert_eq!(err["error"]["field"], "schema");
}

#[test]
fn synth_small_shape_reports_per_decoder_breakdown() {
    let output = cmd()
        .args([
            "synth",
            "--projects",
            "2",
            "--files",
            "2",
            "--matches",
            "2",
            "--n",
            "3",
            "--format",
            "both",
        ])
        .output()
        .expect("synth");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));
    assert_eq!(report["params"]["projects"], 2);
    assert_eq!(report["params"]["term"], "PHP");
    let labels = metric_labels(&report);
    assert_eq!(labels[0], "payload_bytes");
    assert!(labels.contains(&"bind_value_rate:serde_json".to_string()));
    assert!(labels.contains(&"bind_value_rate:simd-json".to_string()));

    let table = String::from_utf8(output.stderr).expect("utf8");
    assert!(table.contains("== synthetic who-uses-json-v1 benchmark =="));
    assert!(table.contains("-- breakdown --"));
}

#[test]
fn completion_emits_script() {
    let output = cmd().args(["completion", "bash"]).output().expect("completion");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("whouses"));
}
