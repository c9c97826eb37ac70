//! Secretlift - Move secrets out of encrypted files into a hosted secret store.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secretlift::cli::output;
use secretlift::cli::{execute, Cli};
use secretlift::core::constants;
use secretlift::error::{AuthError, ConfigError, Error};

fn main() -> ExitCode {
    // Usage errors share exit code 1 with every other fatal error
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("secretlift=debug")
        } else {
            EnvFilter::new("secretlift=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    match execute(cli.command) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            let suggestion = match &e {
                Error::Dependency(dep) => Some(dep.hint().to_string()),
                Error::Auth(AuthError::MissingToken(var)) => {
                    Some(format!("export {}=<machine account token>", var))
                }
                Error::Auth(AuthError::Rejected(_)) => {
                    Some("check the access token and that it can read the project".to_string())
                }
                Error::Config(ConfigError::MissingProjectId) => {
                    Some("pass --project-id <id>, or use --dry-run".to_string())
                }
                Error::Config(ConfigError::PasswordFileUnreadable(_)) => {
                    Some("omit --password-file to be prompted instead".to_string())
                }
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = suggestion {
                output::hint(&hint);
            }
            ExitCode::FAILURE
        }
    }
}
