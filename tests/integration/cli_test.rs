//! CLI contract tests: help/version/codes output and parameter validation.

use assert_cmd::Command;
use predicates::prelude::*;

fn typecat() -> Command {
    Command::cargo_bin("typecat").unwrap()
}

// ============================================================================
// Help / Version / Codes
// ============================================================================

#[test]
fn help_exits_zero_and_shows_options() {
    typecat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--speed"))
        .stdout(predicate::str::contains("--mistakes"))
        .stdout(predicate::str::contains("--print-escapes"))
        .stdout(predicate::str::contains("--line-numbers"))
        .stdout(predicate::str::contains("--allow-resize"));
}

#[test]
fn version_exits_zero() {
    typecat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("typecat"));
}

#[test]
fn codes_lists_the_exit_code_contract() {
    typecat()
        .arg("--codes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes and signals"))
        .stdout(predicate::str::contains("8   - File does not exist"))
        .stdout(predicate::str::contains("SIGINT"))
        .stdout(predicate::str::contains("exit 130"))
        .stdout(predicate::str::contains("SIGWINCH"));
}

// ============================================================================
// Parameter validation
// ============================================================================

#[test]
fn speed_zero_is_rejected_with_code_two() {
    typecat()
        .args(["-s", "0", "-t", "hi"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid speed parameter"));
}

#[test]
fn speed_above_hundred_is_rejected_with_code_two() {
    typecat()
        .args(["--speed", "101", "-t", "hi"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid speed parameter: 101"));
}

#[test]
fn mistakes_above_hundred_is_rejected_with_code_three() {
    typecat()
        .args(["-t", "hi", "-m", "101"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid mistakes parameter: 101"));
}

#[test]
fn color_and_print_escapes_conflict_with_code_six() {
    typecat()
        .args(["-c", "-e", "-t", "hi"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("mutually exclusive"));
}

// ============================================================================
// TTY requirement
// ============================================================================

#[test]
fn piped_output_is_rejected_with_code_one() {
    typecat()
        .args(["-t", "hello"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error (1)"))
        .stderr(predicate::str::contains("piped or redirected"));
}
