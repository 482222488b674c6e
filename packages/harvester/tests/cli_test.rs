//! Tests for the `belex-extract` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_extract_prints_yaml() {
    let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/belex/law_101_1.xhtml");

    Command::cargo_bin("belex-extract")
        .unwrap()
        .arg(fixture)
        .args(["--source-url", "https://example.test/101.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("systematic_number: '101.1'").or(
            predicate::str::contains("systematic_number: \"101.1\""),
        ))
        .stdout(predicate::str::contains("https://example.test/101.1"))
        .stderr(predicate::str::contains("Articles: 4"));
}

#[test]
fn test_extract_prints_json() {
    let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/belex/law_101_1.xhtml");

    Command::cargo_bin("belex-extract")
        .unwrap()
        .arg(fixture)
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"article_number\"").not())
        .stdout(predicate::str::contains("\"number\": \"Art. 1\""));
}

#[test]
fn test_malformed_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.xhtml");
    fs::write(&file, "<html><body></html>").unwrap();

    Command::cargo_bin("belex-extract")
        .unwrap()
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Page markup parsing failed"));
}

#[test]
fn test_missing_file_fails() {
    Command::cargo_bin("belex-extract")
        .unwrap()
        .arg("/nonexistent/page.xhtml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}
