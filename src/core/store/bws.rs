//! Bitwarden Secrets Manager store.
//!
//! Creates secrets via the `bws` CLI. The access token is passed to the child
//! through `BWS_ACCESS_TOKEN` and never appears on a command line.
//!
//! ## Requirements
//!
//! - `bws` CLI must be installed
//! - A machine account access token with write access to the target project

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, trace};

use super::{scrub, SecretStore};
use crate::core::constants;
use crate::core::domain::SecretValue;
use crate::core::process::{self, Input};
use crate::core::types::SecretId;
use crate::error::{AuthError, DependencyError, ProcessError, StoreError};

/// Fields of `bws secret create --output json` that we use.
#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// `bws` CLI client.
#[derive(Debug, Clone)]
pub struct Bws {
    program: PathBuf,
    token: Option<SecretValue>,
    timeout: Duration,
}

impl Bws {
    pub fn new(token: Option<SecretValue>, timeout: Duration) -> Self {
        Self {
            program: PathBuf::from(constants::BWS_BIN),
            token,
            timeout,
        }
    }

    /// Build a client with the token from `BWS_ACCESS_TOKEN`.
    pub fn from_env(timeout: Duration) -> Self {
        let token = std::env::var(constants::ACCESS_TOKEN_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretValue::from);
        Self::new(token, timeout)
    }

    /// Use a specific executable instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(token) = &self.token {
            cmd.env(constants::ACCESS_TOKEN_VAR, token.expose());
        }
        cmd
    }
}

impl SecretStore for Bws {
    fn name(&self) -> &'static str {
        "bws"
    }

    fn ensure_available(&self) -> Result<(), DependencyError> {
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| DependencyError::Missing {
                tool: self.program.display().to_string(),
                hint: "install the Bitwarden Secrets Manager CLI: https://bitwarden.com/help/secrets-manager-cli/",
            })
    }

    fn authenticate(&self, project_id: Option<&str>) -> Result<(), AuthError> {
        if self.token.is_none() {
            return Err(AuthError::MissingToken(constants::ACCESS_TOKEN_VAR));
        }

        let mut cmd = self.command();
        match project_id {
            Some(id) => cmd.args(["project", "get", id]),
            None => cmd.args(["project", "list"]),
        };
        cmd.args(["--output", "json"]);

        let output = process::run(cmd, Input::Null, self.timeout)
            .map_err(|e| AuthError::Rejected(e.to_string()))?;
        if !output.success() {
            return Err(AuthError::Rejected(output.diagnostic()));
        }

        debug!("secret store credential accepted");
        Ok(())
    }

    fn create_secret(
        &self,
        name: &str,
        value: &SecretValue,
        project_id: Option<&str>,
    ) -> Result<SecretId, StoreError> {
        let project_id = project_id.ok_or_else(|| StoreError::CreationFailed {
            name: name.to_string(),
            reason: "no project id given".to_string(),
        })?;

        trace!(name = %name, value_len = value.len(), "creating secret");

        let mut cmd = self.command();
        cmd.args(["secret", "create", name, value.expose(), project_id])
            .args(["--output", "json"]);

        let output = process::run(cmd, Input::Null, self.timeout).map_err(|e| match e {
            ProcessError::TimedOut { after, .. } => StoreError::TimedOut {
                name: name.to_string(),
                after,
            },
            other => StoreError::CreationFailed {
                name: name.to_string(),
                reason: scrub(&other.to_string(), value),
            },
        })?;

        if !output.success() {
            return Err(StoreError::CreationFailed {
                name: name.to_string(),
                reason: scrub(&output.diagnostic(), value),
            });
        }

        let created: Created =
            serde_json::from_slice(&output.stdout).map_err(|e| StoreError::UnexpectedResponse {
                name: name.to_string(),
                reason: format!("invalid JSON at line {} column {}", e.line(), e.column()),
            })?;

        debug!(name = %name, id = %created.id, "secret created");
        Ok(created.id)
    }
}
