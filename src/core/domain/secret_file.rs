//! Secret file type.
//!
//! A discovered, encrypted file together with the naming context derived
//! from its location.

use std::fmt;
use std::path::{Path, PathBuf};

/// Encrypted container format, detected from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerKind {
    /// `$ANSIBLE_VAULT;1.1;AES256` style files
    AnsibleVault,
    /// age files with a scrypt passphrase stanza (armored or binary)
    Age,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::AnsibleVault => "ansible-vault",
            ContainerKind::Age => "age",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encrypted secret file selected for migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretFile {
    path: PathBuf,
    service: String,
    environment: String,
    kind: ContainerKind,
}

impl SecretFile {
    /// Create a secret file from its parts.
    ///
    /// `service` must already be normalized (suffix stripped, underscores
    /// replaced); discovery takes care of that.
    pub fn new(
        path: impl Into<PathBuf>,
        service: impl Into<String>,
        environment: impl Into<String>,
        kind: ContainerKind,
    ) -> Self {
        Self {
            path: path.into(),
            service: service.into(),
            environment: environment.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Service name used as the middle segment of target names.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Environment tag used as the first segment of target names.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }
}

impl fmt::Display for SecretFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
