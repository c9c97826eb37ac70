//! Constants used throughout secretlift.
//!
//! Centralizes magic strings and default settings.

/// Environment tag used when a run does not specify one.
pub const DEFAULT_ENVIRONMENT: &str = "prod";

/// Output directory for report artifacts, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "migration-output";

/// Per-call timeout for external tools, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Upper bound on the worker pool size.
pub const MAX_JOBS: usize = 32;

/// File name endings that mark a secret file.
pub const SECRET_FILE_PATTERNS: &[&str] =
    &["vault.yml", "vault.yaml", "secrets.yml", "secrets.yaml"];

/// Suffixes that mark an unencrypted template counterpart.
pub const TEMPLATE_SUFFIXES: &[&str] = &[".example", ".template", ".sample", ".dist"];

/// Leading bytes of an Ansible Vault container.
pub const ANSIBLE_VAULT_HEADER: &[u8] = b"$ANSIBLE_VAULT;";

/// Leading bytes of an ASCII-armored age file.
pub const AGE_ARMOR_HEADER: &[u8] = b"-----BEGIN AGE ENCRYPTED FILE-----";

/// Leading bytes of a binary age file.
pub const AGE_BINARY_HEADER: &[u8] = b"age-encryption.org/v1";

/// Number of bytes inspected when classifying a file.
pub const HEADER_PROBE_LEN: usize = 64;

/// Environment variable holding the secret store access token.
pub const ACCESS_TOKEN_VAR: &str = "BWS_ACCESS_TOKEN";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "SECRETLIFT_LOG";

/// Config file name under the user config directory.
pub const CONFIG_FILE: &str = "secretlift/config.toml";

/// Decryption tool for Ansible Vault files.
pub const ANSIBLE_VAULT_BIN: &str = "ansible-vault";

/// Bitwarden Secrets Manager CLI.
pub const BWS_BIN: &str = "bws";
