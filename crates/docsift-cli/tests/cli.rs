//! End-to-end checks on the docsift binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("docsift")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn missing_input_fails_cleanly() {
    Command::cargo_bin("docsift")
        .unwrap()
        .args(["process", "no-such-file.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter.docx");
    std::fs::write(&path, b"hello").unwrap();

    Command::cargo_bin("docsift")
        .unwrap()
        .arg("process")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported media kind"));
}

#[test]
fn image_with_no_recoverable_text_still_yields_a_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.png");
    image::DynamicImage::new_luma8(64, 64).save(&path).unwrap();

    // Whether or not a local OCR binary is present, the record must come
    // back with page 1 and no hard error.
    Command::cargo_bin("docsift")
        .unwrap()
        .args(["process", "--no-cloud", "--format", "json"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"page_index\": 1"));
}
