//! Per-secret creation outcomes.

use std::fmt;
use std::path::{Path, PathBuf};

use super::NamedSecret;
use crate::core::types::{SecretId, SecretKey, TargetName};

/// Result of one creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Secret created (or simulated) with this id
    Created(SecretId),
    /// Store rejected the secret; diagnostic never contains the value
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Created(_))
    }

    /// Secret id on success.
    pub fn secret_id(&self) -> Option<&str> {
        match self {
            Outcome::Created(id) => Some(id),
            Outcome::Failed(_) => None,
        }
    }
}

/// Audit record of one attempted creation.
///
/// Keeps the naming context of the secret but not its value, so it can
/// outlive the decrypted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    source_key: SecretKey,
    target_name: TargetName,
    source_file: PathBuf,
    outcome: Outcome,
}

impl CreationResult {
    pub fn new(named: &NamedSecret<'_>, outcome: Outcome) -> Self {
        Self {
            source_key: named.extracted().key().to_string(),
            target_name: named.target().to_string(),
            source_file: named.extracted().source().path().to_path_buf(),
            outcome,
        }
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

impl fmt::Display for CreationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Created(id) => write!(f, "{} -> {} ({})", self.source_key, self.target_name, id),
            Outcome::Failed(_) => write!(f, "{} -> {} (failed)", self.source_key, self.target_name),
        }
    }
}
