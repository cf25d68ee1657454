//! Shared helpers for the integration suite.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs typecat with the given arguments and closed stdin, capturing output.
pub fn run_typecat(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_typecat"))
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute typecat");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Runs typecat with bytes piped to stdin.
pub fn run_typecat_with_stdin(args: &[&str], stdin_bytes: &[u8]) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_typecat"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn typecat");

    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(stdin_bytes)
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait for typecat");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
