//! Domain types.

mod outcome;
mod report;
mod secret;
mod secret_file;
mod value;

pub use outcome::{CreationResult, Outcome};
pub use report::{
    ErrorRecord, FileOutcome, MigrationReport, RunInfo, RunStatus, SkippedFile, Stage,
};
pub use secret::{ExtractedSecret, NamedSecret, SecretValue};
pub use secret_file::{ContainerKind, SecretFile};
pub use value::StructuredValue;
