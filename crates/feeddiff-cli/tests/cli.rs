use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("feeddiff").expect("binary builds")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture write");
    path
}

#[test]
fn diff_identical_payloads_reports_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"status": "ok", "count": 3}"#);
    let right = write(dir.path(), "right.json", r#"{"status": "ok", "count": 3}"#);

    cli()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .assert()
        .success()
        .stdout(
            "left: [\"count\", \"status\"]\n\
             right: [\"count\", \"status\"]\n\
             no differences found\n",
        );
}

#[test]
fn diff_reports_missing_keys_and_value_changes() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"feedTitle": "X", "lang": "en"}"#);
    let right = write(dir.path(), "right.json", r#"{"feedTitle": "Y"}"#);

    cli()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .assert()
        .code(1)
        .stdout(
            "left: [\"feedTitle\", \"lang\"]\n\
             right: [\"feedTitle\"]\n\
             keys only in left at : [\"lang\"]\n\
             value difference at feedTitle: 'X' vs 'Y'\n",
        );
}

#[test]
fn diff_prints_feed_counts_and_descends_with_at() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(
        dir.path(),
        "left.json",
        r#"{"status": "ok", "feeds": [{"n": 5}]}"#,
    );
    let right = write(
        dir.path(),
        "right.json",
        r#"{"status": "ok", "feeds": [{"n": "5"}, {"n": 6}]}"#,
    );

    cli()
        .args(["diff", "--at", "feeds[0]"])
        .arg(&left)
        .arg(&right)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("feeds: 1 vs 2"))
        .stdout(predicate::str::contains(
            "type mismatch at feeds[0].n: number vs string",
        ));
}

#[test]
fn diff_rejects_missing_at_path() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"feeds": []}"#);
    let right = write(dir.path(), "right.json", r#"{"feeds": []}"#);

    cli()
        .args(["diff", "--at", "feeds[5]"])
        .arg(&left)
        .arg(&right)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no value at feeds[5]"));
}

#[test]
fn diff_rejects_malformed_at_path() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", "{}");
    let right = write(dir.path(), "right.json", "{}");

    cli()
        .args(["diff", "--at", "a..b"])
        .arg(&left)
        .arg(&right)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty key segment"));
}

#[test]
fn diff_reports_decode_errors_with_position() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", "{oops");
    let right = write(dir.path(), "right.json", "{}");

    cli()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid JSON at line 1 column"));
}

#[test]
fn diff_exempt_key_flag_suppresses_value_differences() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"feedUrl": "a"}"#);
    let right = write(dir.path(), "right.json", r#"{"feedUrl": "b"}"#);

    cli()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .assert()
        .code(1);

    cli()
        .args(["diff", "--exempt-key", "feedUrl"])
        .arg(&left)
        .arg(&right)
        .assert()
        .success()
        .stdout(predicate::str::contains("no differences found"));
}

#[test]
fn diff_no_default_filters_compares_exempted_fields() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"title": "A"}"#);
    let right = write(dir.path(), "right.json", r#"{"title": "B"}"#);

    cli()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .assert()
        .success();

    cli()
        .args(["diff", "--no-default-filters"])
        .arg(&left)
        .arg(&right)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "value difference at title: 'A' vs 'B'",
        ));
}

#[test]
fn diff_json_output_is_machine_readable() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"n": 5}"#);
    let right = write(dir.path(), "right.json", r#"{"n": "5"}"#);

    let output = cli()
        .args(["diff", "--json"])
        .arg(&left)
        .arg(&right)
        .output()
        .expect("binary runs");
    assert_eq!(output.status.code(), Some(1));

    let diffs: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON output");
    assert_eq!(
        diffs,
        json!([{"path": "n", "kind": "type_mismatch", "detail": "number vs string"}])
    );
}

#[test]
fn diff_sample_out_writes_left_payload() {
    let dir = TempDir::new().expect("tempdir");
    let left = write(dir.path(), "left.json", r#"{"status": "ok"}"#);
    let right = write(dir.path(), "right.json", r#"{"status": "ok"}"#);
    let sample = dir.path().join("sample.json");

    cli()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .arg("--sample-out")
        .arg(&sample)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&sample).expect("sample written"))
            .expect("sample parses");
    assert_eq!(written, json!({"status": "ok"}));
}

#[test]
fn describe_reports_fields_author_and_first_item() {
    let dir = TempDir::new().expect("tempdir");
    let file = write(
        dir.path(),
        "payload.json",
        r#"{"a": 1, "b": [1, 2, 3], "author": {"name": "Bob"}}"#,
    );

    cli()
        .arg("describe")
        .arg(&file)
        .assert()
        .success()
        .stdout(
            "a: number = 1\n\
             author: object = {\"name\": \"Bob\"}\n\
             b: array = [1, 2, 3]\n\
             author.name: string = Bob\n",
        );
}

#[test]
fn describe_descends_into_the_first_feed() {
    let dir = TempDir::new().expect("tempdir");
    let file = write(
        dir.path(),
        "payload.json",
        r#"{"feeds": [{"feedTitle": "X"}, {"feedTitle": "Y"}]}"#,
    );

    cli()
        .arg("describe")
        .arg(&file)
        .assert()
        .success()
        .stdout("feeds: 2\nfeedTitle: string = X\n");
}

#[test]
fn describe_salvages_truncated_payloads() {
    let dir = TempDir::new().expect("tempdir");
    let file = write(
        dir.path(),
        "truncated.json",
        r#"{"feeds": [{"feedTitle": "X", "items": []}"#,
    );

    cli()
        .arg("describe")
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid JSON"));

    cli()
        .args(["describe", "--salvage"])
        .arg(&file)
        .assert()
        .success()
        .stdout("feedTitle: string = X\nitems: array = []\n")
        .stderr(predicate::str::contains("salvaged first complete object"));
}

#[test]
fn describe_non_object_payload() {
    let dir = TempDir::new().expect("tempdir");
    let file = write(dir.path(), "payload.json", "[1, 2]");

    cli()
        .arg("describe")
        .arg(&file)
        .assert()
        .success()
        .stdout("nothing to describe (array payload)\n");
}

#[test]
fn describe_sample_out_keeps_only_the_first_feed() {
    let dir = TempDir::new().expect("tempdir");
    let file = write(
        dir.path(),
        "payload.json",
        r#"{"feeds": [{"a": 1}, {"b": 2}]}"#,
    );
    let sample = dir.path().join("sample.json");

    cli()
        .arg("describe")
        .arg(&file)
        .arg("--sample-out")
        .arg(&sample)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&sample).expect("sample written"))
            .expect("sample parses");
    assert_eq!(written, json!({"feeds": [{"a": 1}]}));
}
