//! Decryption providers.
//!
//! Turns an encrypted secret file into plaintext held in memory only.
//! Nothing decrypted is ever written to a filesystem path.
//!
//! ## Providers
//!
//! - **ansible-vault**: `ansible-vault view`, plaintext read from its stdout.
//! - **age**: in-process scrypt passphrase decryption via the `age` crate.
//!
//! [`ProviderSet`] dispatches on the container kind detected at discovery.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::core::domain::{ContainerKind, SecretFile, SecretValue};
use crate::error::{ConfigError, DecryptError, DependencyError};

mod age;
mod ansible;

pub use self::age::AgeFile;
pub use self::ansible::AnsibleVault;

/// Where the decryption credential comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Automated mode: read the password from this file
    PasswordFile(PathBuf),
    /// Manual mode: ask on the terminal
    Prompt,
}

impl CredentialSource {
    /// Pick the credential source for a run.
    ///
    /// A configured password file must exist and be readable; without one the
    /// user is prompted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PasswordFileUnreadable` for a configured file that
    /// cannot be opened.
    pub fn resolve(configured: Option<&Path>) -> Result<Self, ConfigError> {
        match configured {
            Some(path) => {
                if path.is_file() && File::open(path).is_ok() {
                    debug!(path = %path.display(), "using password file");
                    Ok(CredentialSource::PasswordFile(path.to_path_buf()))
                } else {
                    Err(ConfigError::PasswordFileUnreadable(path.to_path_buf()))
                }
            }
            None => {
                debug!("no password file configured, prompting");
                Ok(CredentialSource::Prompt)
            }
        }
    }

    /// Prompting serializes on the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self, CredentialSource::Prompt)
    }
}

/// Decrypts secret files.
///
/// Implementations must never persist plaintext and must never put the
/// credential into an error.
pub trait DecryptionProvider: Send + Sync {
    /// Decrypt `file` and return its plaintext.
    ///
    /// # Errors
    ///
    /// Returns `DecryptError` on a wrong credential or provider failure.
    fn decrypt(
        &self,
        file: &SecretFile,
        credential: &CredentialSource,
    ) -> Result<SecretValue, DecryptError>;

    /// Check that whatever is needed for `kind` is installed.
    ///
    /// # Errors
    ///
    /// Returns `DependencyError::Missing` if an external tool is absent.
    fn ensure_available(&self, _kind: ContainerKind) -> Result<(), DependencyError> {
        Ok(())
    }
}

/// Dispatches to the provider for each container kind.
pub struct ProviderSet {
    ansible: AnsibleVault,
    age: AgeFile,
}

impl ProviderSet {
    pub fn new(timeout: Duration) -> Self {
        Self {
            ansible: AnsibleVault::new(timeout),
            age: AgeFile,
        }
    }
}

impl DecryptionProvider for ProviderSet {
    fn decrypt(
        &self,
        file: &SecretFile,
        credential: &CredentialSource,
    ) -> Result<SecretValue, DecryptError> {
        match file.kind() {
            ContainerKind::AnsibleVault => self.ansible.decrypt(file, credential),
            ContainerKind::Age => self.age.decrypt(file, credential),
        }
    }

    fn ensure_available(&self, kind: ContainerKind) -> Result<(), DependencyError> {
        match kind {
            ContainerKind::AnsibleVault => self.ansible.ensure_available(kind),
            ContainerKind::Age => self.age.ensure_available(kind),
        }
    }
}

/// Read a password file, dropping the trailing newline.
pub(crate) fn read_password(path: &Path, file: &SecretFile) -> Result<SecretValue, DecryptError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|_| DecryptError::failed(file.path(), "cannot read password file"))?;
    let raw = SecretValue::from(raw);
    Ok(SecretValue::new(raw.expose().trim_end_matches(['\r', '\n'])))
}
