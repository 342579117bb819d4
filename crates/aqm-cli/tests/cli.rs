use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const SELF_TEST_HEX: &str = "013f32ff6feb010000ffff";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("aqm"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn mixed_uplinks() -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join("mixed")
        .join("input.jsonl")
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("decode").and(contains("schema")));
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn decode_hex_outputs_ttn_json() {
    let assert = cmd()
        .arg("decode")
        .arg("--hex")
        .arg(SELF_TEST_HEX)
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value["data"]["header"], 1);
    assert_eq!(value["data"]["battery_voltage"], 6.3);
    assert_eq!(value["data"]["temperature"], -20.6);
    assert_eq!(value["data"]["humidity"], 55.5);
    assert_eq!(value["data"]["pressure"], 982);
    assert_eq!(value["data"]["tvoc"], 0);
    assert!(value["data"]["co2"].is_null());
    assert_eq!(value["errors"], serde_json::json!([]));
}

#[test]
fn decode_hex_accepts_prefix() {
    let assert = cmd()
        .arg("decode")
        .arg("--hex")
        .arg(format!("0x{SELF_TEST_HEX}"))
        .assert()
        .success();
    assert_eq!(stdout_json(&assert)["data"]["pressure"], 982);
}

#[test]
fn decode_hex_chirpstack_format() {
    let assert = cmd()
        .arg("decode")
        .arg("--hex")
        .arg(SELF_TEST_HEX)
        .arg("--format")
        .arg("chirpstack")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value["states"]["humidity"], 55.5);
    assert!(value.get("errors").is_none());
}

#[test]
fn truncated_hex_reports_error_in_output() {
    let assert = cmd()
        .arg("decode")
        .arg("--hex")
        .arg("013f32")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert!(value["data"].is_null());
    assert!(value["errors"][0].as_str().unwrap().contains("truncated"));
}

#[test]
fn fail_on_error_exits_non_zero() {
    cmd()
        .arg("decode")
        .arg("--hex")
        .arg("013f32")
        .arg("--fail-on-error")
        .assert()
        .failure()
        .stderr(contains("1 uplink(s) failed to decode").and(contains("hint:")));
}

#[test]
fn strict_rejects_trailing_bytes() {
    let long = format!("{SELF_TEST_HEX}00");
    let assert = cmd()
        .arg("decode")
        .arg("--hex")
        .arg(&long)
        .arg("--strict")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert!(value["errors"][0].as_str().unwrap().contains("trailing bytes"));

    let assert = cmd().arg("decode").arg("--hex").arg(&long).assert().success();
    assert_eq!(stdout_json(&assert)["data"]["pressure"], 982);
}

#[test]
fn invalid_hex_shows_error_and_hint() {
    cmd()
        .arg("decode")
        .arg("--hex")
        .arg("01z")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn hex_and_input_conflict() {
    cmd()
        .arg("decode")
        .arg("--hex")
        .arg(SELF_TEST_HEX)
        .arg("--input")
        .arg(mixed_uplinks())
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("decode")
        .arg("--input")
        .arg(temp.path().join("missing.jsonl"))
        .assert()
        .failure()
        .stderr(contains("input file not found").and(contains("hint:")));
}

#[test]
fn unmatched_glob_fails() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("decode")
        .arg("--input")
        .arg(temp.path().join("*.jsonl"))
        .assert()
        .failure()
        .stderr(contains("no files match pattern"));
}

#[test]
fn batch_writes_output_file() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("out").join("decoded.json");

    cmd()
        .arg("decode")
        .arg("--input")
        .arg(mixed_uplinks())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("OK: 5 uplink(s) decoded"));

    let json = fs::read_to_string(&output).expect("read output");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    let outputs = value.as_array().expect("array");
    assert_eq!(outputs.len(), 5);
    assert_eq!(outputs[1]["data"]["co2"], 400);
    assert!(outputs[2]["data"].is_null());
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("decoded.json");

    cmd()
        .arg("decode")
        .arg("--input")
        .arg(mixed_uplinks())
        .arg("-o")
        .arg(output)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn batch_fail_on_error_still_writes_output() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("decoded.json");

    cmd()
        .arg("decode")
        .arg("--input")
        .arg(mixed_uplinks())
        .arg("-o")
        .arg(&output)
        .arg("--fail-on-error")
        .assert()
        .failure()
        .stderr(contains("2 uplink(s) failed to decode"));
    assert!(output.exists());
}

#[test]
fn glob_decodes_files_in_order() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(
        temp.path().join("b.jsonl"),
        format!("{{\"fPort\":1,\"hex\":\"02{}\"}}\n", &SELF_TEST_HEX[2..]),
    )
    .expect("write b");
    fs::write(
        temp.path().join("a.jsonl"),
        format!("{{\"fPort\":1,\"hex\":\"{SELF_TEST_HEX}\"}}\n"),
    )
    .expect("write a");

    let assert = cmd()
        .arg("decode")
        .arg("--input")
        .arg(temp.path().join("*.jsonl"))
        .arg("--format")
        .arg("chirpstack")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value[0]["states"]["header"], 1);
    assert_eq!(value[1]["states"]["header"], 2);
}

#[test]
fn output_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("uplinks.jsonl");
    fs::write(&input, format!("{{\"fPort\":1,\"hex\":\"{SELF_TEST_HEX}\"}}\n")).expect("write");

    cmd()
        .arg("decode")
        .arg("--input")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("output path must differ from input"));
}

#[test]
fn malformed_uplink_file_fails_with_line() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("uplinks.jsonl");
    fs::write(&input, "{\"fPort\":1,\"bytes\":[1]}\n{oops\n").expect("write");

    cmd()
        .arg("decode")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("line 2"));
}

#[test]
fn schema_lists_fields() {
    let assert = cmd().arg("schema").assert().success();
    let value = stdout_json(&assert);
    assert_eq!(value["payload_len"], 11);
    let fields = value["fields"].as_array().expect("fields");
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[2]["name"], "temperature");
    assert_eq!(fields[2]["signed"], true);
    assert_eq!(fields[4]["scale"]["op"], "multiply");
}
