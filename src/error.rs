//! Error types.
//!
//! Fatal errors (`Config`, `Dependency`, `Auth`, `Report`) abort a run before
//! or after file processing. Stage errors (`Decrypt`, `Parse`, `Naming`,
//! `Store`) are recoverable: the orchestrator turns them into report entries
//! and keeps going.
//!
//! No variant ever carries a decrypted secret value.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Run configuration and precondition errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read root directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("password file {0} does not exist or is not readable")]
    PasswordFileUnreadable(PathBuf),

    #[error("live mode requires a project id")]
    MissingProjectId,

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A required external tool is not installed.
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("{tool} not found in PATH")]
    Missing { tool: String, hint: &'static str },
}

impl DependencyError {
    /// Installation hint for the missing tool.
    pub fn hint(&self) -> &'static str {
        match self {
            DependencyError::Missing { hint, .. } => hint,
        }
    }
}

/// Secret store credential problems, detected once at startup.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0} is not set")]
    MissingToken(&'static str),

    #[error("secret store rejected the access token: {0}")]
    Rejected(String),
}

/// Failure to decrypt one secret file.
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("decryption failed for {path}: {reason}")]
    Failed { path: PathBuf, reason: String },

    #[error("decryption of {path} timed out after {}s", .after.as_secs())]
    TimedOut { path: PathBuf, after: Duration },

    #[error("decrypted content of {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

impl DecryptError {
    pub fn failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DecryptError::Failed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Decrypted content is not a usable structured document.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{path} is not valid YAML: {reason}")]
    Syntax { path: PathBuf, reason: String },

    #[error("{path} top level is {found}, expected a mapping")]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("{path} yields key '{key}' more than once")]
    DuplicateKey { path: PathBuf, key: String },

    #[error("{path} list at '{key}' cannot be rendered as JSON: {reason}")]
    Render {
        path: PathBuf,
        key: String,
        reason: String,
    },
}

/// Two distinct source leaves map to the same target name.
#[derive(Error, Debug)]
pub enum NamingError {
    #[error("target name {name} already claimed by '{first_key}' in {}", .first_file.display())]
    Duplicate {
        name: String,
        first_file: PathBuf,
        first_key: String,
    },
}

/// Secret store creation errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create {name}: {reason}")]
    CreationFailed { name: String, reason: String },

    #[error("creating {name} timed out after {}s", .after.as_secs())]
    TimedOut { name: String, after: Duration },

    #[error("unexpected response creating {name}: {reason}")]
    UnexpectedResponse { name: String, reason: String },
}

/// Failure to write a report artifact.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize mapping: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure running an external tool.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .after.as_secs())]
    TimedOut { program: String, after: Duration },

    #[error("io error talking to {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
