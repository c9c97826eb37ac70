//! Report artifacts.
//!
//! At the end of a run the report is written exactly once as:
//!
//! - `migration-report-<timestamp>.txt`: human-readable summary
//! - `secret-mapping-<timestamp>.csv`: source key to target secret mapping
//! - `secret-mapping-<timestamp>.json`: the same mapping, when requested
//!
//! The timestamp has millisecond resolution. If artifacts with that stamp
//! already exist, a `-<n>` suffix is added, so no run replaces another's
//! files.
//!
//! Each file is written to a temporary file in the output directory and then
//! renamed into place, so an interrupted run never leaves a partial artifact
//! at the final path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::domain::MigrationReport;
use crate::error::ReportError;

pub mod human;
pub mod mapping;

/// Paths of written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub report: PathBuf,
    pub mapping: PathBuf,
    pub json_mapping: Option<PathBuf>,
}

/// Write all artifacts for `report` into `dir`.
///
/// # Errors
///
/// Returns `ReportError::Write` if the directory cannot be created or a file
/// cannot be written and renamed, including when another writer created it
/// first.
pub fn write_artifacts(
    report: &MigrationReport,
    dir: &Path,
    json_mapping: bool,
) -> Result<Artifacts, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let base = report.info().started_at.format("%Y%m%dT%H%M%S%.3fZ").to_string();
    let artifacts = free_names(dir, &base, json_mapping);

    write_atomic(&artifacts.report, human::render(report).as_bytes())?;
    write_atomic(
        &artifacts.mapping,
        mapping::render_csv(report.results()).as_bytes(),
    )?;
    if let Some(path) = &artifacts.json_mapping {
        write_atomic(path, mapping::render_json(report.results())?.as_bytes())?;
    }

    Ok(artifacts)
}

/// First set of artifact paths for `base` where none of the files exist.
fn free_names(dir: &Path, base: &str, json_mapping: bool) -> Artifacts {
    let names = |stamp: &str| Artifacts {
        report: dir.join(format!("migration-report-{}.txt", stamp)),
        mapping: dir.join(format!("secret-mapping-{}.csv", stamp)),
        json_mapping: json_mapping.then(|| dir.join(format!("secret-mapping-{}.json", stamp))),
    };
    let taken = |a: &Artifacts| {
        a.report.exists()
            || a.mapping.exists()
            || a.json_mapping.as_ref().is_some_and(|p| p.exists())
    };

    let mut candidate = names(base);
    let mut n = 1;
    while taken(&candidate) {
        debug!(stamp = %base, attempt = n, "artifact names taken");
        candidate = names(&format!("{}-{}", base, n));
        n += 1;
    }
    candidate
}

/// Write `contents` to `path` via a sibling temporary file and a rename.
///
/// Never replaces an existing file at `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(err)?;
    tmp.write_all(contents).map_err(err)?;
    tmp.as_file().sync_all().map_err(err)?;
    tmp.persist_noclobber(path).map_err(|e| err(e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(())
}
