//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::path::Path;
use std::process::Output;

/// Variables that would leak the developer's setup into a test.
const SCRUBBED_VARS: &[&str] = &[
    "BWS_ACCESS_TOKEN",
    "SECRETLIFT_ROOT",
    "SECRETLIFT_PROJECT_ID",
    "SECRETLIFT_ENVIRONMENT",
    "SECRETLIFT_PASSWORD_FILE",
    "SECRETLIFT_OUTPUT_DIR",
    "SECRETLIFT_LOG",
];

impl Test {
    /// Create a secretlift command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME and the config dir pointing at the temporary home
    /// - Current directory set to the test working directory
    /// - No inherited secretlift or bws variables, no colors
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("secretlift").expect("failed to find secretlift binary");
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `secretlift scan`.
    pub fn scan(&self) -> Output {
        self.cmd()
            .arg("scan")
            .arg("--root")
            .arg(self.root.path())
            .output()
            .expect("failed to run secretlift scan")
    }

    /// Base `secretlift migrate` command with root, output dir and password file.
    pub fn migrate_cmd(&self, password_file: &Path) -> Command {
        self.migrate_cmd_into(password_file, &self.output_dir())
    }

    /// Like `migrate_cmd`, writing artifacts to `output_dir`.
    pub fn migrate_cmd_into(&self, password_file: &Path, output_dir: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("migrate")
            .arg("--root")
            .arg(self.root.path())
            .arg("--output-dir")
            .arg(output_dir)
            .arg("--password-file")
            .arg(password_file);
        cmd
    }

    /// Shortcut for a dry run with the right passphrase.
    pub fn migrate_dry(&self, extra: &[&str]) -> Output {
        self.migrate_dry_into(&self.output_dir(), extra)
    }

    /// Dry run writing artifacts to `output_dir`.
    pub fn migrate_dry_into(&self, output_dir: &Path, extra: &[&str]) -> Output {
        let pass = self.password_file(super::PASSPHRASE);
        self.migrate_cmd_into(&pass, output_dir)
            .arg("--dry-run")
            .args(extra)
            .output()
            .expect("failed to run secretlift migrate --dry-run")
    }
}
