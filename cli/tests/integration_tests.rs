use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const NAVAL_FATE: &str = "\
Naval Fate.

Usage:
  naval_fate ship new <name>...
  naval_fate ship <name> move <x> <y> [--speed=<kn>]
  naval_fate mine (set|remove) <x> <y> [--moored|--drifting]
  naval_fate -h | --help
  naval_fate --version

Options:
  -h --help     Show this screen.
  --version     Show version.
  --speed=<kn>  Speed in knots [default: 10].
  --moored      Moored (anchored) mine.
  --drifting    Drifting mine.
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write test file");
    path
}

fn usage_match(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_usage-match"))
        .args(args)
        .output()
        .expect("failed to run usage-match")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn match_prints_bound_values() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "naval.txt", NAVAL_FATE);

    let output = usage_match(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--",
        "ship",
        "Guardian",
        "move",
        "10",
        "50",
        "--speed=20",
    ]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["kind"], "matched");
    assert_eq!(json["args"]["<name>"], serde_json::json!(["Guardian"]));
    assert_eq!(json["args"]["--speed"], "20");
    assert_eq!(json["args"]["move"], true);
    assert_eq!(json["args"]["mine"], false);
}

#[test]
fn match_syntax_error_exits_one() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "naval.txt", NAVAL_FATE);

    let output = usage_match(&["match", "--doc", doc.to_str().unwrap(), "--", "ship"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["kind"], "syntax_error");
    assert!(json["output"].as_str().unwrap().starts_with("Usage:"));
}

#[test]
fn match_help_and_version() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "naval.txt", NAVAL_FATE);
    let doc = doc.to_str().unwrap();

    let output = usage_match(&["match", "--doc", doc, "--format", "table", "--", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Naval Fate."));

    let output = usage_match(&[
        "match",
        "--doc",
        doc,
        "--program-version",
        "2.0",
        "--",
        "--version",
    ]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["kind"], "version");
    assert_eq!(json["output"], "2.0");

    let output = usage_match(&["match", "--doc", doc, "--no-help", "--", "--help"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["args"]["--help"], true);
}

#[test]
fn match_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "doc.txt", "usage: prog [--opt] [<args>...]\n");
    let config = write_file(&dir, "handler.yml", "options_first: true\n");

    let output = usage_match(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--",
        "a",
        "--opt",
    ]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["args"]["--opt"], false);
    assert_eq!(json["args"]["<args>"], serde_json::json!(["a", "--opt"]));
}

#[test]
fn match_with_exit_config_prints_raw_text() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "doc.txt", "Usage: prog <x>\n");
    let config = write_file(&dir, "handler.yml", "exit: true\n");

    let output = usage_match(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), "Usage: prog <x>\n");
}

#[test]
fn match_yaml_format() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "doc.txt", "Usage: prog -v...\n");

    let output = usage_match(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--format",
        "yaml",
        "--",
        "-vvv",
    ]);
    assert!(output.status.success());
    let yaml: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(yaml["kind"].as_str(), Some("matched"));
    assert_eq!(yaml["args"]["-v"].as_u64(), Some(3));
}

#[test]
fn invalid_doc_reports_error() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "broken.txt", "Usage: prog (a\n");

    let output = usage_match(&["match", "--doc", doc.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: Invalid usage doc"));
    assert!(stderr.contains("unmatched '('"));
}

#[test]
fn missing_doc_reports_error() {
    let output = usage_match(&["match", "--doc", "/nonexistent/doc.txt"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn inspect_shows_options_and_pattern() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "naval.txt", NAVAL_FATE);

    let output = usage_match(&["inspect", "--doc", doc.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage:"));
    assert!(stdout.contains("-h, --help"));
    assert!(stdout.contains("--speed           1     \"10\""));
    assert!(stdout.contains("pattern: Required(Either(Required("));

    let output = usage_match(&["inspect", "--doc", doc.to_str().unwrap(), "--format", "json"]);
    let json = stdout_json(&output);
    assert_eq!(json["options"].as_array().unwrap().len(), 5);
}

#[test]
fn batch_matches_every_line_in_order() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "naval.txt", NAVAL_FATE);
    let input = write_file(
        &dir,
        "argv.txt",
        "ship new a b\n\nmine set 1 2 --moored\nship\nship x move 1 2\n",
    );

    let output = usage_match(&[
        "batch",
        "--doc",
        doc.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
        "--jobs",
        "2",
    ]);
    assert!(output.status.success());

    let records: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 4);
    assert_eq!(
        records.iter().map(|r| r["line"].as_u64().unwrap()).collect::<Vec<_>>(),
        vec![1, 3, 4, 5]
    );
    assert_eq!(records[0]["response"]["args"]["<name>"], serde_json::json!(["a", "b"]));
    assert_eq!(records[1]["response"]["args"]["--moored"], true);
    assert_eq!(records[2]["response"]["kind"], "syntax_error");
    assert_eq!(records[3]["response"]["args"]["--speed"], "10");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 4 argv line(s) did not match."));
}
