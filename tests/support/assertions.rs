//! Test assertion helpers.

use std::process::Output;

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Assert the process exit code.
pub fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit code\nstdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stdout contains a string.
pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(
        out.contains(expected),
        "stdout missing '{}', got: {}",
        expected,
        out
    );
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Assert that none of `values` appears on stdout or stderr.
pub fn assert_no_values(output: &Output, values: &[&str]) {
    let out = stdout(output);
    let err = stderr(output);
    for value in values {
        assert!(!out.contains(value), "stdout leaked '{}': {}", value, out);
        assert!(!err.contains(value), "stderr leaked '{}': {}", value, err);
    }
}

/// Assert that none of `values` appears in `text`.
pub fn assert_text_excludes(text: &str, values: &[&str]) {
    for value in values {
        assert!(!text.contains(value), "leaked '{}' in: {}", value, text);
    }
}
