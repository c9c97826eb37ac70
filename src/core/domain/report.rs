//! Migration report accumulator.
//!
//! The orchestrator owns one [`MigrationReport`] per run. Work on a single
//! file is collected into a [`FileOutcome`] first and merged with
//! [`MigrationReport::absorb`], so counters only ever move through this type.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::CreationResult;
use crate::core::types::ProjectId;

/// Pipeline stage an error was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Decrypt,
    Parse,
    Naming,
    Create,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Decrypt, Stage::Parse, Stage::Naming, Stage::Create];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Decrypt => "decrypt",
            Stage::Parse => "parse",
            Stage::Naming => "naming",
            Stage::Create => "create",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable error with enough context to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub stage: Stage,
    pub file: PathBuf,
    pub key: Option<String>,
    pub message: String,
}

impl ErrorRecord {
    /// Error affecting a whole file.
    pub fn file(stage: Stage, file: &Path, message: impl fmt::Display) -> Self {
        Self {
            stage,
            file: file.to_path_buf(),
            key: None,
            message: message.to_string(),
        }
    }

    /// Error affecting a single key within a file.
    pub fn secret(stage: Stage, file: &Path, key: &str, message: impl fmt::Display) -> Self {
        Self {
            stage,
            file: file.to_path_buf(),
            key: Some(key.to_string()),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "[{}] {} ({}): {}", self.stage, self.file.display(), key, self.message),
            None => write!(f, "[{}] {}: {}", self.stage, self.file.display(), self.message),
        }
    }
}

/// A name-matched file that was not migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything that happened to one file.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// Decryption and extraction both succeeded
    pub processed: bool,
    pub discovered: usize,
    pub created: usize,
    pub errors: Vec<ErrorRecord>,
    pub results: Vec<CreationResult>,
}

impl FileOutcome {
    pub fn failed(error: ErrorRecord) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// Record a creation attempt, successful or not.
    pub fn push_result(&mut self, result: CreationResult) {
        if result.outcome().is_success() {
            self.created += 1;
        }
        self.results.push(result);
    }
}

/// Static facts about a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    pub root: PathBuf,
    pub environment: String,
    pub project_id: Option<ProjectId>,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
}

/// Overall result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No errors recorded (including "nothing found")
    Clean,
    /// Completed, but some files or secrets need manual attention
    Partial,
}

impl RunStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::Partial => 2,
        }
    }
}

/// Accumulated statistics and records for one run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    info: RunInfo,
    finished_at: Option<DateTime<Utc>>,
    files_processed: usize,
    secrets_discovered: usize,
    secrets_created: usize,
    skipped: Vec<SkippedFile>,
    errors: Vec<ErrorRecord>,
    results: Vec<CreationResult>,
}

impl MigrationReport {
    pub fn new(info: RunInfo) -> Self {
        Self {
            info,
            finished_at: None,
            files_processed: 0,
            secrets_discovered: 0,
            secrets_created: 0,
            skipped: Vec::new(),
            errors: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Merge the outcome of one file.
    pub fn absorb(&mut self, outcome: FileOutcome) {
        if outcome.processed {
            self.files_processed += 1;
        }
        self.secrets_discovered += outcome.discovered;
        self.secrets_created += outcome.created;
        self.errors.extend(outcome.errors);
        self.results.extend(outcome.results);
    }

    pub fn record_skipped(&mut self, skipped: impl IntoIterator<Item = SkippedFile>) {
        self.skipped.extend(skipped);
    }

    /// Stamp the finish time. Later calls keep the first stamp.
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn info(&self) -> &RunInfo {
        &self.info
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    pub fn secrets_discovered(&self) -> usize {
        self.secrets_discovered
    }

    pub fn secrets_created(&self) -> usize {
        self.secrets_created
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn results(&self) -> &[CreationResult] {
        &self.results
    }

    /// Errors recorded in one stage, in recording order.
    pub fn errors_in(&self, stage: Stage) -> impl Iterator<Item = &ErrorRecord> {
        self.errors.iter().filter(move |e| e.stage == stage)
    }

    pub fn status(&self) -> RunStatus {
        if self.errors.is_empty() {
            RunStatus::Clean
        } else {
            RunStatus::Partial
        }
    }
}
