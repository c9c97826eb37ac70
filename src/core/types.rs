//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A flattened, dotted-path key (e.g., `admin.password`).
pub type SecretKey = String;

/// A name in the target secret store (e.g., `prod-api-db-password`).
pub type TargetName = String;

/// Identifier returned by the secret store for a created secret.
pub type SecretId = String;

/// Project or namespace identifier in the secret store.
pub type ProjectId = String;
