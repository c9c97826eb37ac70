//! Tests for `secretlift migrate` in dry-run mode.

use crate::support::*;

#[test]
fn test_dry_run_writes_report_and_mapping() {
    let t = Test::new();
    t.write_age("roles/api/api_vault.yml", DISTINCT_DOC);
    t.write_age("roles/db/db_vault.yml", WITH_NULL_DOC);

    let output = t.migrate_dry(&["--environment", "staging"]);

    assert_exit(&output, 0);
    assert_stdout_contains(&output, "secrets created");
    assert_no_values(&output, SENSITIVE_VALUES);

    let report = t.artifact("migration-report-");
    assert!(report.contains("mode:          dry-run"));
    assert!(report.contains("secrets discovered:  4"));
    assert!(report.contains("secrets created:     4"));
    assert_text_excludes(&report, SENSITIVE_VALUES);

    let csv = t.artifact("secret-mapping-");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("source_key,target_name,secret_id,source_file"));
    assert!(csv.contains("api_token,staging-api-api-token,dry-run-"));
    assert!(csv.contains("nested.password,staging-api-nested.password,dry-run-"));
    assert!(csv.contains("db_pass,staging-db-db-pass,dry-run-"));
    assert!(!csv.contains("unused"));
    assert_text_excludes(&csv, SENSITIVE_VALUES);
}

#[test]
fn test_dry_run_ids_stable_across_runs() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    let first_dir = t.dir.path().join("first");
    let second_dir = t.dir.path().join("second");
    assert_exit(&t.migrate_dry_into(&first_dir, &[]), 0);
    assert_exit(&t.migrate_dry_into(&second_dir, &[]), 0);

    let first = read_artifact(&first_dir, "secret-mapping-");
    let second = read_artifact(&second_dir, "secret-mapping-");
    assert!(first.contains("dry-run-"));
    assert_eq!(first, second);
}

#[test]
fn test_wrong_passphrase_is_partial_failure() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);
    let wrong = t.dir.path().join("wrong-pass");
    std::fs::write(&wrong, "not the passphrase\n").unwrap();

    let output = t.migrate_cmd(&wrong).arg("--dry-run").output().unwrap();

    assert_exit(&output, 2);
    assert_no_values(&output, &["not the passphrase"]);

    let report = t.artifact("migration-report-");
    assert!(report.contains("decrypt (1)"));
    assert!(report.contains("api_vault.yml"));
    assert!(!report.contains("not the passphrase"));
}

#[test]
fn test_unusable_document_skips_file_only() {
    let t = Test::new();
    t.write_age("list_vault.yml", "- just\n- a list\n");
    t.write_age("ok_vault.yml", "token: fine-value\n");

    let output = t.migrate_dry(&[]);

    assert_exit(&output, 2);
    let report = t.artifact("migration-report-");
    assert!(report.contains("parse (1)"));
    assert!(report.contains("files processed:     1"));
    assert!(report.contains("secrets created:     1"));
}

#[test]
fn test_no_files_found_is_clean() {
    let t = Test::new();
    t.write("README.md", "nothing here\n");

    let output = t.migrate_dry(&[]);

    assert_exit(&output, 0);
    assert_stdout_contains(&output, "no secrets found");
    assert_eq!(t.artifact("secret-mapping-"), "source_key,target_name,secret_id,source_file\n");
}

#[test]
fn test_json_mapping_flag() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    let output = t.migrate_dry(&["--json-mapping"]);

    assert_exit(&output, 0);
    let json_files: Vec<_> = std::fs::read_dir(t.output_dir())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |x| x == "json"))
        .collect();
    assert_eq!(json_files.len(), 1);

    let text = std::fs::read_to_string(&json_files[0]).unwrap();
    assert_text_excludes(&text, SENSITIVE_VALUES);
    let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["source_key"], "api_token");
    assert_eq!(rows[0]["status"], "created");
}

#[test]
fn test_config_file_sets_environment_and_output() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);
    let config = t.dir.path().join("secretlift.toml");
    std::fs::write(&config, "environment = \"qa\"\noutput_dir = \"from-config\"\n").unwrap();

    let pass = t.password_file(PASSPHRASE);
    let output = t
        .cmd()
        .arg("migrate")
        .arg("--root")
        .arg(t.root.path())
        .arg("--password-file")
        .arg(&pass)
        .arg("--dry-run")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert_exit(&output, 0);
    let csv = read_artifact(&t.dir.path().join("from-config"), "secret-mapping-");
    assert!(csv.contains("qa-api-api-token"));
}

#[test]
fn test_repeated_runs_keep_earlier_artifacts() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);

    assert_exit(&t.migrate_dry(&[]), 0);
    assert_exit(&t.migrate_dry(&[]), 0);

    let reports = std::fs::read_dir(t.output_dir())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with("migration-report-")
        })
        .count();
    assert_eq!(reports, 2);
}

#[test]
fn test_config_paths_expand_home() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);
    std::fs::write(t.home.path().join(".vault-pass"), format!("{}\n", PASSPHRASE)).unwrap();
    let config = t.dir.path().join("secretlift.toml");
    std::fs::write(
        &config,
        "password_file = \"~/.vault-pass\"\noutput_dir = \"~/reports\"\n",
    )
    .unwrap();

    let output = t
        .cmd()
        .arg("migrate")
        .arg("--root")
        .arg(t.root.path())
        .arg("--dry-run")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert_exit(&output, 0);
    let csv = read_artifact(&t.home.path().join("reports"), "secret-mapping-");
    assert!(csv.contains("prod-api-api-token"));
}

#[test]
fn test_environment_variables_supply_flags() {
    let t = Test::new();
    t.write_age("api_vault.yml", DISTINCT_DOC);
    let pass = t.password_file(PASSPHRASE);

    let output = t
        .cmd()
        .args(["migrate", "--dry-run"])
        .env("SECRETLIFT_ROOT", t.root.path())
        .env("SECRETLIFT_PASSWORD_FILE", &pass)
        .env("SECRETLIFT_ENVIRONMENT", "dev")
        .env("SECRETLIFT_OUTPUT_DIR", t.output_dir())
        .output()
        .unwrap();

    assert_exit(&output, 0);
    assert!(t.artifact("secret-mapping-").contains("dev-api-api-token"));
}

#[test]
fn test_parallel_jobs_match_sequential_mapping() {
    let t = Test::new();
    for i in 0..5 {
        t.write_age(&format!("svc{}/vault.yml", i), &flat_doc("key", 3));
    }

    let seq = t.dir.path().join("seq");
    let par = t.dir.path().join("par");
    assert_exit(&t.migrate_dry_into(&seq, &[]), 0);
    assert_exit(&t.migrate_dry_into(&par, &["--jobs", "4"]), 0);

    let sequential = read_artifact(&seq, "secret-mapping-");
    assert_eq!(sequential.lines().count(), 16);
    assert_eq!(sequential, read_artifact(&par, "secret-mapping-"));
}
