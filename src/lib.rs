//! Secretlift - Move secrets out of encrypted files into a hosted secret store.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── migrate       # Run a migration and write the report
//! │   ├── scan          # List what would be migrated
//! │   ├── output        # Terminal output helpers
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # Config file and flag resolution
//!     ├── discovery     # Find encrypted secret files
//!     ├── decrypt/      # Decryption providers
//!     │   ├── mod       # DecryptionProvider trait
//!     │   ├── ansible   # ansible-vault subprocess
//!     │   └── age       # age passphrase files
//!     ├── extract       # Flatten documents into key/value pairs
//!     ├── naming        # Target secret names
//!     ├── store/        # Target secret stores
//!     │   ├── mod       # SecretStore trait
//!     │   ├── bws       # Bitwarden Secrets Manager CLI
//!     │   └── dry_run   # Synthetic ids, no side effects
//!     ├── migrate       # Orchestrator
//!     └── report/       # Report and mapping artifacts
//! ```
//!
//! # Guarantees
//!
//! - Decrypted values live only in memory and are zeroed on drop
//! - Values never appear in logs, reports or error messages
//! - A bad file or secret is recorded and skipped, the run continues
//! - Dry runs never contact the secret store

pub mod cli;
pub mod core;
pub mod error;
