use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;

const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:dfdl="http://www.ogf.org/dfdl/dfdl-1.0/">
  <xs:element name="file">
    <xs:complexType>
      <xs:sequence>
        
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>
"#;

fn dfdls_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dfdls"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(dfdls_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn run_with_stdin(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(dfdls_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "Expected exit 0, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_schema(dir: &Path, content: &str) {
    std::fs::write(dir.join("schema.dfdl.xsd"), content).unwrap();
}

#[test]
fn context_reports_enclosing_sequence() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), SCHEMA);

    let output = run(
        dir.path(),
        &["context", "schema.dfdl.xsd", "--line", "5", "--character", "8"],
    );
    let json = stdout_json(&output);

    assert_eq!(json["prefix"], "xs:");
    assert_eq!(json["nearest_open"], "none");
    assert_eq!(json["unmatched"], "none");
    assert_eq!(json["enclosing"]["tag"], "sequence");
    assert_eq!(json["enclosing"]["line"], 4);
    assert_eq!(json["enclosing_close"]["line"], 6);
    assert_eq!(json["brace_open"], false);
}

#[test]
fn complete_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_with_stdin(
        dir.path(),
        &["complete", "--line", "5", "--character", "8"],
        SCHEMA,
    );
    let json = stdout_json(&output);
    let labels: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["label"].as_str().unwrap())
        .collect();

    assert_eq!(labels[0], "xs:element name");
    assert!(labels.contains(&"xs:choice"));
    assert!(labels.contains(&"dfdl:assert"));
}

#[test]
fn close_prints_edit() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(
        dir.path(),
        "<xs:schema>\n  <xs:sequence>\n</xs:schema>\n",
    );

    let output = run(
        dir.path(),
        &["close", "schema.dfdl.xsd", "--line", "1", "--character", "15"],
    );
    let json = stdout_json(&output);

    assert_eq!(json["snippet"], ">\n  \t$0\n  </xs:sequence>");
    assert_eq!(json["range"]["start"]["character"], 14);
    assert_eq!(json["range"]["end"]["character"], 15);
}

#[test]
fn close_apply_prints_document() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(
        dir.path(),
        "<xs:schema>\n  <xs:sequence>\n</xs:schema>\n",
    );

    let output = run(
        dir.path(),
        &["close", "schema.dfdl.xsd", "--line", "1", "--character", "15", "--apply"],
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<xs:schema>\n  <xs:sequence>\n  \t\n  </xs:sequence>\n</xs:schema>\n"
    );
}

#[test]
fn close_without_unmatched_tag_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), SCHEMA);

    let output = run(
        dir.path(),
        &["close", "schema.dfdl.xsd", "--line", "4", "--character", "19"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "null");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to close."));
}

#[test]
fn character_column_counts_chars() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(
        dir.path(),
        "<xs:schema>\n  <xs:element name=\"é\">\n</xs:schema>\n",
    );

    let output = run(
        dir.path(),
        &["close", "schema.dfdl.xsd", "--line", "1", "--character", "23"],
    );
    let json = stdout_json(&output);

    assert_eq!(json["range"]["end"]["character"], 24);
    assert_eq!(json["snippet"], ">\n  \t$0\n  </xs:element>");
}

#[test]
fn default_prefix_comes_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dfdls.toml"), "default_prefix = \"xsd\"\n").unwrap();
    write_schema(dir.path(), "<xsd:sequence>\n  \n</xsd:sequence>\n");

    let output = run(
        dir.path(),
        &["context", "schema.dfdl.xsd", "--line", "1", "--character", "2"],
    );
    let json = stdout_json(&output);

    assert_eq!(json["prefix"], "xsd:");
    assert_eq!(json["enclosing"]["tag"], "sequence");
}

#[test]
fn line_past_end_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), SCHEMA);

    let output = run(
        dir.path(),
        &["context", "schema.dfdl.xsd", "--line", "99", "--character", "0"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid cursor 99:0"), "stderr: {stderr}");
    assert!(stderr.contains("out of range"), "stderr: {stderr}");
}

#[test]
fn invalid_settings_are_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dfdls.toml"), "debug = not_a_boolean\n").unwrap();
    write_schema(dir.path(), SCHEMA);

    let output = run(
        dir.path(),
        &["context", "schema.dfdl.xsd", "--line", "0", "--character", "0"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load settings"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(
        dir.path(),
        &["context", "missing.xsd", "--line", "0", "--character", "0"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read missing.xsd"));
}
