//! Dry-run store.
//!
//! Never contacts anything. Ids are derived from the target name so two dry
//! runs over the same input produce the same mapping.

use sha2::{Digest, Sha256};
use tracing::debug;

use super::SecretStore;
use crate::core::domain::SecretValue;
use crate::core::types::SecretId;
use crate::error::{AuthError, StoreError};

/// Simulated store for `--dry-run`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl DryRun {
    /// Synthetic id for `name`.
    pub fn synthetic_id(name: &str) -> SecretId {
        let digest = Sha256::digest(name.as_bytes());
        let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
        format!("dry-run-{}", hex)
    }
}

impl SecretStore for DryRun {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn authenticate(&self, _project_id: Option<&str>) -> Result<(), AuthError> {
        Ok(())
    }

    fn create_secret(
        &self,
        name: &str,
        value: &SecretValue,
        _project_id: Option<&str>,
    ) -> Result<SecretId, StoreError> {
        debug!(name = %name, value_len = value.len(), "dry-run create");
        Ok(Self::synthetic_id(name))
    }
}
