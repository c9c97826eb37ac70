//! Secret store clients.
//!
//! The orchestrator talks to the target secret manager through the
//! [`SecretStore`] trait. [`Bws`] drives the Bitwarden Secrets Manager CLI;
//! [`DryRun`] stands in for it when no side effects are wanted.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g., `vault.rs`)
//! 3. Re-export from this module

use crate::core::domain::SecretValue;
use crate::core::types::SecretId;
use crate::error::{AuthError, DependencyError, StoreError};

mod bws;
mod dry_run;

pub use bws::Bws;
pub use dry_run::DryRun;

/// Target secret manager.
///
/// Implementations make exactly one attempt per call. Retries, if any,
/// belong to the caller.
pub trait SecretStore: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Check that the store's tooling is installed.
    ///
    /// # Errors
    ///
    /// Returns `DependencyError::Missing` if an external tool is absent.
    fn ensure_available(&self) -> Result<(), DependencyError> {
        Ok(())
    }

    /// Verify the access credential once, before any secret is created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the credential is missing or rejected.
    fn authenticate(&self, project_id: Option<&str>) -> Result<(), AuthError>;

    /// Create one secret and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` naming the target; never the value.
    fn create_secret(
        &self,
        name: &str,
        value: &SecretValue,
        project_id: Option<&str>,
    ) -> Result<SecretId, StoreError>;
}

/// Remove every occurrence of `value` from a diagnostic.
pub(crate) fn scrub(diagnostic: &str, value: &SecretValue) -> String {
    if value.is_empty() {
        diagnostic.to_string()
    } else {
        diagnostic.replace(value.expose(), "[REDACTED]")
    }
}
