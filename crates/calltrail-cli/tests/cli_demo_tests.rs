//! CLI demo integration tests
//!
//! Run the built binary and check the call tree it prints through the
//! tracing subscriber.

use std::process::{Command, Output};

fn run_demo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_calltrail"))
        .arg("demo")
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("CALLTRAIL_PROFILE")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_cli_demo_prints_nested_tree() {
    let output = run_demo(&["--profile", "development", "--depth", "2"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = stdout_lines(&output);
    assert_eq!(lines.iter().filter(|l| l.contains("Init: ")).count(), 2);
    assert_eq!(lines.iter().filter(|l| l.contains("Exit: [")).count(), 2);
    assert!(lines.iter().any(|l| l.contains("level: 1")));
    assert!(lines.iter().any(|l| l.contains("remaining: 0")));
    assert_eq!(lines.last().map(String::as_str), Some("result: 3"));
}

#[test]
fn test_cli_demo_async_completes() {
    let output = run_demo(&["--profile", "development", "--depth", "3", "--async"]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.iter().filter(|l| l.contains("Exit: [")).count(), 3);
    assert_eq!(lines.last().map(String::as_str), Some("result: 6"));
}

#[test]
fn test_cli_demo_fail_reports_error() {
    let output = run_demo(&["--profile", "development", "--depth", "2", "--fail"]);

    assert!(!output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.iter().filter(|l| l.contains("OnException: ")).count(), 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("call chain exhausted at level 2"));
}

#[test]
fn test_cli_demo_test_profile_is_silent() {
    let output = run_demo(&["--profile", "test", "--depth", "2"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["result: 3"]);
}

#[test]
fn test_cli_demo_rejects_empty_indent_unit() {
    let output = run_demo(&["--profile", "test", "--indent-unit", ""]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("indent"));
}

#[test]
fn test_cli_demo_rejects_unknown_profile() {
    let output = run_demo(&["--profile", "verbose"]);

    assert!(!output.status.success());
}
