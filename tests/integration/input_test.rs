//! Input acquisition tests: file errors, binary sniffing, piped stdin.

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use crate::helpers::{run_typecat, run_typecat_with_stdin};

#[test]
fn missing_file_exits_eight() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.txt");

    let (_stdout, stderr, code) = run_typecat(&[path.to_str().unwrap()]);
    assert_eq!(code, 8);
    assert!(stderr.contains("File does not exist"), "stderr: {stderr}");
}

#[test]
fn empty_file_exits_nine() {
    let file = NamedTempFile::new().unwrap();

    let (_stdout, stderr, code) = run_typecat(&[file.path().to_str().unwrap()]);
    assert_eq!(code, 9);
    assert!(stderr.contains("File is empty"), "stderr: {stderr}");
}

#[test]
fn binary_file_exits_ten() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\x00\x01\x02\x03 not text").unwrap();
    file.flush().unwrap();

    let (_stdout, stderr, code) = run_typecat(&[file.path().to_str().unwrap()]);
    assert_eq!(code, 10);
    assert!(stderr.contains("appears to be binary"), "stderr: {stderr}");
}

#[test]
fn show_all_overrides_the_binary_file_check() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\x00\x01\x02\x03 not text").unwrap();
    file.flush().unwrap();

    // The binary gate passes; with output piped the run then stops at the
    // TTY requirement instead.
    let (_stdout, stderr, code) = run_typecat(&["-a", file.path().to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error (1)"), "stderr: {stderr}");
}

#[test]
fn binary_stdin_exits_four() {
    let (_stdout, stderr, code) = run_typecat_with_stdin(&[], b"\x00\x01\x02\x03");
    assert_eq!(code, 4);
    assert!(stderr.contains("appears to be binary"), "stderr: {stderr}");
}

#[test]
fn text_stdin_with_piped_output_stops_at_the_tty_gate() {
    let (_stdout, stderr, code) = run_typecat_with_stdin(&[], b"hello\nworld\n");
    assert_eq!(code, 1);
    assert!(stderr.contains("piped or redirected"), "stderr: {stderr}");
}

#[test]
fn text_flag_with_piped_output_stops_at_the_tty_gate() {
    let (_stdout, stderr, code) = run_typecat(&["-t", "one", "-t", "two"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error (1)"), "stderr: {stderr}");
}
