use assert_cmd::Command;
use assert_fs::prelude::*;
use serde_json::{Value, json};

fn rows_file(dir: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
    let rows = dir.child("rows.json");
    rows.write_str(
        &json!([
            { "sectionName": "A", "sectionOrder": 2, "fieldName": "X", "fieldType": "number" },
            { "sectionName": "B", "sectionOrder": 1, "fieldName": "Y", "fieldType": "checkbox",
              "fieldCriteria": "1-1{>5}" }
        ])
        .to_string(),
    )
    .expect("write rows");
    rows
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("form-cli").expect("binary");
    cmd.env_remove("FORM_SPEC_DIALECT").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: std::process::Output) -> Value {
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn build_prints_text_review() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let rows = rows_file(&dir);
    let output = cli()
        .args(["build", "--dialect", "positional", "--rows"])
        .arg(rows.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.contains("[-] Y (checkbox)"));
    assert!(text.contains("[+] X (number)"));
}

#[test]
fn edit_makes_dependent_field_visible() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let rows = rows_file(&dir);
    let output = cli()
        .args(["edit", "--dialect", "positional", "--format", "json", "--set", "X=10", "--rows"])
        .arg(rows.path())
        .output()
        .expect("run");
    let review = stdout_json(output);
    assert_eq!(review["sections"][0]["fields"][0]["visible"], true);
    assert_eq!(review["sections"][1]["fields"][0]["value"], "10");
}

#[test]
fn dialect_can_come_from_environment() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let rows = rows_file(&dir);
    let output = cli()
        .env("FORM_SPEC_DIALECT", "positional")
        .args(["edit", "--format", "json", "--set", "X=3", "--rows"])
        .arg(rows.path())
        .output()
        .expect("run");
    let review = stdout_json(output);
    assert_eq!(review["sections"][0]["fields"][0]["visible"], false);
    assert!(
        review["sections"][0]["fields"][0]["details"][0]
            .as_str()
            .is_some_and(|detail| detail.contains("does not satisfy >5"))
    );
}

#[test]
fn apply_restores_saved_review() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let rows = rows_file(&dir);
    let saved = cli()
        .args(["edit", "--dialect", "positional", "--format", "json", "--set", "X=8", "--rows"])
        .arg(rows.path())
        .output()
        .expect("run");
    let saved = stdout_json(saved);
    let review = dir.child("review.json");
    review.write_str(&saved.to_string()).expect("write review");

    let output = cli()
        .args(["apply", "--dialect", "positional", "--format", "json", "--rows"])
        .arg(rows.path())
        .arg("--review")
        .arg(review.path())
        .output()
        .expect("run");
    assert_eq!(stdout_json(output), saved);
}

#[test]
fn upstream_error_fails_the_command() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let rows = dir.child("rows.json");
    rows.write_str(r#"{"error":"metadata service unavailable"}"#)
        .expect("write rows");
    let output = cli()
        .args(["build", "--rows"])
        .arg(rows.path())
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("metadata source failed: metadata service unavailable"));
}

#[test]
fn unknown_edit_target_fails_the_command() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let rows = rows_file(&dir);
    let output = cli()
        .args(["edit", "--set", "Missing=1", "--rows"])
        .arg(rows.path())
        .output()
        .expect("run");
    assert!(!output.status.success());
}

#[test]
fn schema_command_prints_json_schema() {
    let output = cli().arg("schema").output().expect("run");
    let schema = stdout_json(output);
    assert_eq!(schema["title"], "ReviewPayload");
}
