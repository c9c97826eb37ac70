//! Target name derivation.
//!
//! `{environment}-{service}-{variable}` where `variable` is the flattened key
//! with underscores turned into hyphens. Dots from nesting are kept, so
//! `admin.password` in `myservice` under `staging` becomes
//! `staging-myservice-admin.password`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::domain::SecretFile;
use crate::core::types::TargetName;
use crate::error::NamingError;

/// Variable segment of a target name.
pub fn variable_name(key: &str) -> String {
    key.replace('_', "-")
}

/// Derive the target name for `key` in `file` under `environment`.
pub fn target_name(key: &str, file: &SecretFile, environment: &str) -> TargetName {
    format!("{}-{}-{}", environment, file.service(), variable_name(key))
}

/// Names claimed so far in one run.
///
/// The first `(file, key)` to claim a name keeps it; a different source
/// claiming the same name is rejected instead of silently overwriting.
#[derive(Debug, Default)]
pub struct NameRegistry {
    claimed: HashMap<TargetName, (PathBuf, String)>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `key` in `file`.
    ///
    /// Claiming again from the same source is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NamingError::Duplicate` if another source already holds it.
    pub fn claim(&mut self, name: &str, file: &Path, key: &str) -> Result<(), NamingError> {
        match self.claimed.get(name) {
            Some((first_file, first_key)) if first_file == file && first_key == key => Ok(()),
            Some((first_file, first_key)) => Err(NamingError::Duplicate {
                name: name.to_string(),
                first_file: first_file.clone(),
                first_key: first_key.clone(),
            }),
            None => {
                self.claimed
                    .insert(name.to_string(), (file.to_path_buf(), key.to_string()));
                Ok(())
            }
        }
    }
}
