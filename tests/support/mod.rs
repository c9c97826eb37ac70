//! Test support utilities for secretlift integration tests.
//!
//! Provides an isolated tree of secret files plus helpers to run the binary
//! against it.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own source tree, working dir and home dir. Child
/// processes use `.current_dir()` and explicit env vars, so tests can run in
/// parallel.
pub struct Test {
    /// Tree of secret files handed to `--root`
    pub root: TempDir,
    /// Working directory, holds password files and output
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp root"),
            dir: TempDir::new().expect("failed to create temp dir"),
            home: TempDir::new().expect("failed to create temp home"),
        }
    }

    /// Write a plain file under the source tree.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Write an age-encrypted secret file under the source tree.
    pub fn write_age(&self, rel: &str, yaml: &str) -> PathBuf {
        self.write(rel, age_encrypt(yaml, PASSPHRASE))
    }

    /// Write the password file and return its path.
    pub fn password_file(&self, passphrase: &str) -> PathBuf {
        let path = self.dir.path().join("vault-pass");
        std::fs::write(&path, format!("{}\n", passphrase)).expect("failed to write password file");
        path
    }

    /// Output directory used by `migrate` helpers.
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Contents of the single artifact in the output dir starting with `prefix`.
    pub fn artifact(&self, prefix: &str) -> String {
        read_artifact(&self.output_dir(), prefix)
    }
}

/// Read the only file in `dir` whose name starts with `prefix`.
pub fn read_artifact(dir: &Path, prefix: &str) -> String {
    let matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("output dir missing")
        .map(|e| e.expect("bad dir entry").path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(prefix))
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(matches.len(), 1, "expected one {} artifact, got {:?}", prefix, matches);
    std::fs::read_to_string(&matches[0]).expect("failed to read artifact")
}
