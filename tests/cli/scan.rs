//! Tests for `secretlift scan`.

use crate::support::*;

#[test]
fn test_scan_lists_encrypted_files_only() {
    let t = Test::new();
    t.write_age("roles/api/api_vault.yml", DISTINCT_DOC);
    t.write("roles/api/api_vault.yml.example", "api_token: changeme\n");
    t.write("roles/web/secrets.yml", "plain: text\n");
    t.write(".git/vault.yml", "$ANSIBLE_VAULT;1.1;AES256\n00\n");

    let output = t.scan();

    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("api_vault.yml"));
    assert!(out.contains("prod-api-*"));
    assert!(out.contains("age"));
    assert!(!out.contains(".example"));
    assert!(!out.contains(".git"));
    // plaintext match is listed as skipped
    assert!(out.contains("roles/web/secrets.yml") || out.contains("secrets.yml"));
    assert_stdout_contains(&output, "1 file(s) found");
}

#[test]
fn test_scan_never_decrypts() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    // no password file and no terminal: scanning must not prompt
    let output = t.scan();

    assert_success(&output);
    assert_no_values(&output, SENSITIVE_VALUES);
}

#[test]
fn test_scan_empty_tree() {
    let t = Test::new();

    let output = t.scan();

    assert_success(&output);
    assert_stdout_contains(&output, "no secret files found");
}
