//! Command-line interface.

pub mod completions;
pub mod migrate;
pub mod output;
pub mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::domain::RunStatus;

/// Secretlift - Move secrets out of encrypted files into a hosted secret store.
#[derive(Parser)]
#[command(
    name = "secretlift",
    about = "Move secrets out of encrypted files into a hosted secret store",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Migrate every discovered secret file into the secret store
    Migrate(MigrateArgs),

    /// List secret files that would be migrated, without decrypting them
    Scan {
        /// Directory to search
        #[arg(long, env = "SECRETLIFT_ROOT")]
        root: PathBuf,
        /// Environment tag for target names
        #[arg(short, long, env = "SECRETLIFT_ENVIRONMENT")]
        environment: Option<String>,
        /// Config file (default: <config dir>/secretlift/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `migrate`.
#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Directory to search for secret files
    #[arg(long, env = "SECRETLIFT_ROOT")]
    pub root: PathBuf,

    /// Target project id (required unless --dry-run)
    #[arg(long, env = "SECRETLIFT_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Environment tag used as the target name prefix [default: prod]
    #[arg(short, long, env = "SECRETLIFT_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Simulate the migration without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// File holding the decryption password (prompts when absent)
    #[arg(long, env = "SECRETLIFT_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,

    /// Where to write the report and mapping [default: migration-output]
    #[arg(short, long, env = "SECRETLIFT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Files processed in parallel (1-32)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Timeout in seconds for each external call [default: 60]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also write the mapping as JSON
    #[arg(long)]
    pub json_mapping: bool,

    /// Config file (default: <config dir>/secretlift/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
///
/// Returns the run status so the binary can pick an exit code.
pub fn execute(command: Command) -> crate::error::Result<RunStatus> {
    use Command::*;

    match command {
        Migrate(args) => migrate::execute(args),
        Scan {
            root,
            environment,
            config,
        } => scan::execute(root, environment, config).map(|_| RunStatus::Clean),
        Completions { shell } => completions::execute(shell).map(|_| RunStatus::Clean),
    }
}
