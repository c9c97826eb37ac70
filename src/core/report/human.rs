//! Human-readable report.

use std::fmt::Write;

use crate::core::domain::{MigrationReport, Stage};

/// Render the report text.
///
/// Contains counts, skipped files and errors grouped by stage. Never
/// contains secret values; the report does not hold any.
pub fn render(report: &MigrationReport) -> String {
    let info = report.info();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Secret migration report");
    let _ = writeln!(out, "=======================");
    let _ = writeln!(out);
    let _ = writeln!(out, "root:          {}", info.root.display());
    let _ = writeln!(out, "environment:   {}", info.environment);
    let _ = writeln!(
        out,
        "project:       {}",
        info.project_id.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "mode:          {}",
        if info.dry_run { "dry-run" } else { "live" }
    );
    let _ = writeln!(out, "started:       {}", info.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at() {
        let _ = writeln!(out, "finished:      {}", finished.to_rfc3339());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "-------");
    let _ = writeln!(out, "files processed:     {}", report.files_processed());
    let _ = writeln!(out, "files skipped:       {}", report.skipped().len());
    let _ = writeln!(out, "secrets discovered:  {}", report.secrets_discovered());
    let _ = writeln!(out, "secrets created:     {}", report.secrets_created());
    let _ = writeln!(out, "errors:              {}", report.errors().len());

    if !report.skipped().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped files");
        let _ = writeln!(out, "-------------");
        for skipped in report.skipped() {
            let _ = writeln!(out, "  {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    if !report.errors().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors");
        let _ = writeln!(out, "------");
        for stage in Stage::ALL {
            let errors: Vec<_> = report.errors_in(stage).collect();
            if errors.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{} ({})", stage, errors.len());
            for error in errors {
                match &error.key {
                    Some(key) => {
                        let _ = writeln!(
                            out,
                            "  {} [{}]: {}",
                            error.file.display(),
                            key,
                            error.message
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  {}: {}", error.file.display(), error.message);
                    }
                }
            }
        }
    }

    out
}
