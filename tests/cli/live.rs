//! Live migrations against a stand-in `bws` placed first on PATH.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Output;

use crate::support::*;

/// Fails creation for any value starting with `pw-` and echoes the value on
/// stderr the way a chatty validation error would.
const FAKE_BWS: &str = r#"#!/bin/sh
[ -n "$BWS_ACCESS_TOKEN" ] || { echo "missing access token" >&2; exit 1; }
[ "$BWS_ACCESS_TOKEN" = "good-token" ] || { echo "401 Unauthorized" >&2; exit 1; }
case "$1 $2" in
  "project get") [ "$3" = "proj-1" ] && { echo '{"id":"proj-1"}'; exit 0; }
                 echo "404 project not found" >&2; exit 1 ;;
  "secret create")
    case "$4" in pw-*) echo "400 invalid value $4" >&2; exit 1 ;; esac
    printf '{"id":"uuid-%s","key":"%s"}\n' "$3" "$3"; exit 0 ;;
esac
exit 64
"#;

fn fake_bin(t: &Test) -> PathBuf {
    let bin = t.dir.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let script = bin.join("bws");
    std::fs::write(&script, FAKE_BWS).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    bin
}

fn live(t: &Test, token: Option<&str>, project: &str) -> Output {
    let bin = fake_bin(t);
    let pass = t.password_file(PASSPHRASE);
    let mut cmd = t.migrate_cmd(&pass);
    cmd.args(["--project-id", project])
        .env("PATH", format!("{}:/usr/bin:/bin", bin.display()));
    if let Some(token) = token {
        cmd.env("BWS_ACCESS_TOKEN", token);
    }
    cmd.output().unwrap()
}

#[test]
fn test_live_run_creates_and_isolates_failures() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    let output = live(&t, Some("good-token"), "proj-1");

    assert_exit(&output, 2);
    assert_no_values(&output, SENSITIVE_VALUES);

    let csv = t.artifact("secret-mapping-");
    assert!(csv.contains("api_token,prod-api-api-token,uuid-prod-api-api-token,"));
    assert!(csv.contains("nested.password,prod-api-nested.password,,"));

    let report = t.artifact("migration-report-");
    assert!(report.contains("create (1)"));
    assert!(report.contains("[nested.password]"));
    assert!(report.contains("[REDACTED]"));
    assert_text_excludes(&report, SENSITIVE_VALUES);
}

#[test]
fn test_missing_token_is_fatal() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    let output = live(&t, None, "proj-1");

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "BWS_ACCESS_TOKEN");
    assert!(!t.output_dir().exists());
}

#[test]
fn test_rejected_token_is_fatal() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    let output = live(&t, Some("stale-token"), "proj-1");

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "401");
}

#[test]
fn test_unknown_project_is_fatal() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    let output = live(&t, Some("good-token"), "proj-2");

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "project not found");
}

#[test]
fn test_missing_store_cli_is_fatal_with_hint() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);
    let pass = t.password_file(PASSPHRASE);
    let empty = t.dir.path().join("empty-bin");
    std::fs::create_dir_all(&empty).unwrap();

    let output = t
        .migrate_cmd(&pass)
        .args(["--project-id", "proj-1"])
        .env("PATH", &empty)
        .env("BWS_ACCESS_TOKEN", "good-token")
        .output()
        .unwrap();

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "bws not found");
    assert_stderr_contains(&output, "install");
}
