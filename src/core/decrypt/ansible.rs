//! Ansible Vault provider.
//!
//! Decrypts with `ansible-vault view`, which writes plaintext to stdout and
//! never touches the filesystem.
//!
//! ## Requirements
//!
//! - `ansible-vault` must be installed (ships with `ansible-core`)

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, trace};

use super::{CredentialSource, DecryptionProvider};
use crate::core::constants;
use crate::core::domain::{ContainerKind, SecretFile, SecretValue};
use crate::core::process::{self, Input};
use crate::error::{DecryptError, DependencyError, ProcessError};

/// `ansible-vault` CLI provider.
#[derive(Debug, Clone)]
pub struct AnsibleVault {
    program: PathBuf,
    timeout: Duration,
}

impl AnsibleVault {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: PathBuf::from(constants::ANSIBLE_VAULT_BIN),
            timeout,
        }
    }

    /// Use a specific executable instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, file: &SecretFile, credential: &CredentialSource) -> (Command, Input) {
        let mut cmd = Command::new(&self.program);
        cmd.arg("view");
        let input = match credential {
            CredentialSource::PasswordFile(path) => {
                cmd.arg("--vault-password-file").arg(path);
                Input::Null
            }
            CredentialSource::Prompt => {
                cmd.arg("--ask-vault-pass");
                Input::Inherit
            }
        };
        cmd.arg(file.path());
        // Keep ansible from paging the output
        cmd.env("PAGER", "cat");
        (cmd, input)
    }
}

impl DecryptionProvider for AnsibleVault {
    fn decrypt(
        &self,
        file: &SecretFile,
        credential: &CredentialSource,
    ) -> Result<SecretValue, DecryptError> {
        trace!(path = %file.path().display(), "decrypting with ansible-vault");

        let (cmd, input) = self.command(file, credential);
        let output = process::run(cmd, input, self.timeout).map_err(|e| match e {
            ProcessError::TimedOut { after, .. } => DecryptError::TimedOut {
                path: file.path().to_path_buf(),
                after,
            },
            other => DecryptError::failed(file.path(), other.to_string()),
        })?;

        if !output.success() {
            debug!(path = %file.path().display(), "ansible-vault view failed");
            return Err(DecryptError::failed(file.path(), output.diagnostic()));
        }

        let plaintext = std::str::from_utf8(&output.stdout).map_err(|_| DecryptError::NotUtf8 {
            path: file.path().to_path_buf(),
        })?;

        trace!(plaintext_len = plaintext.len(), "decrypted with ansible-vault");
        Ok(SecretValue::new(plaintext))
    }

    fn ensure_available(&self, kind: ContainerKind) -> Result<(), DependencyError> {
        if kind != ContainerKind::AnsibleVault {
            return Ok(());
        }
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| DependencyError::Missing {
                tool: self.program.display().to_string(),
                hint: "install ansible-core: pip install ansible-core",
            })
    }
}
