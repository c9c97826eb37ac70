//! Migrate command.

use tracing::info;

use crate::cli::{output, MigrateArgs};
use crate::core::config::{FileConfig, Overrides, Settings};
use crate::core::decrypt::{CredentialSource, ProviderSet};
use crate::core::domain::{MigrationReport, RunStatus, Stage};
use crate::core::migrate::{Migrator, Options};
use crate::core::report::{self, Artifacts};
use crate::core::store::Bws;
use crate::error::Result;

/// Run a migration and write its artifacts.
pub fn execute(args: MigrateArgs) -> Result<RunStatus> {
    let file = FileConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(
        Overrides {
            root: args.root,
            project_id: args.project_id,
            environment: args.environment,
            dry_run: args.dry_run,
            password_file: args.password_file,
            output_dir: args.output_dir,
            jobs: args.jobs,
            timeout_secs: args.timeout,
            json_mapping: args.json_mapping,
        },
        file,
    )?;

    info!(
        root = %settings.root.display(),
        environment = %settings.environment,
        dry_run = settings.dry_run,
        jobs = settings.jobs,
        "running migration"
    );

    let credential = CredentialSource::resolve(settings.password_file.as_deref())?;
    let decryptor = ProviderSet::new(settings.timeout);
    let store = Bws::from_env(settings.timeout);

    let migrator = Migrator::new(
        &decryptor,
        &store,
        credential,
        Options {
            environment: settings.environment.clone(),
            project_id: settings.project_id.clone(),
            dry_run: settings.dry_run,
            jobs: settings.jobs,
        },
    );

    let report = migrator.run(&settings.root, &settings.rules)?;
    let artifacts = report::write_artifacts(&report, &settings.output_dir, settings.json_mapping)?;

    print_summary(&report, &artifacts);
    Ok(report.status())
}

fn print_summary(report: &MigrationReport, artifacts: &Artifacts) {
    let title = if report.info().dry_run {
        "Migration (dry run)"
    } else {
        "Migration"
    };
    output::section(title);
    output::kv("files processed   ", report.files_processed());
    output::kv("files skipped     ", report.skipped().len());
    output::kv("secrets discovered", report.secrets_discovered());
    output::kv("secrets created   ", report.secrets_created());
    output::kv("errors            ", report.errors().len());
    println!();

    match report.status() {
        RunStatus::Clean if report.secrets_discovered() == 0 => {
            output::dimmed("no secrets found");
        }
        RunStatus::Clean => {
            output::success(&format!("{} secrets migrated", report.secrets_created()));
        }
        RunStatus::Partial => {
            for stage in Stage::ALL {
                let count = report.errors_in(stage).count();
                if count > 0 {
                    output::warn(&format!("{} {} error(s)", count, stage));
                }
            }
        }
    }

    output::list_item(&format!("report   {}", output::path(artifacts.report.display())));
    output::list_item(&format!("mapping  {}", output::path(artifacts.mapping.display())));
    if let Some(json) = &artifacts.json_mapping {
        output::list_item(&format!("json     {}", output::path(json.display())));
    }
}
