//! Machine-readable mapping from source keys to target secrets.
//!
//! CSV columns: `source_key,target_name,secret_id,source_file`. Fields that
//! contain a comma, quote, CR or LF are quoted with embedded quotes doubled
//! (RFC 4180). Failed creations keep their row with an empty `secret_id`.

use serde::Serialize;

use crate::core::domain::{CreationResult, Outcome};
use crate::error::ReportError;

/// CSV header row.
pub const HEADER: [&str; 4] = ["source_key", "target_name", "secret_id", "source_file"];

/// One JSON mapping entry.
#[derive(Debug, Serialize)]
struct Row<'a> {
    source_key: &'a str,
    target_name: &'a str,
    secret_id: Option<&'a str>,
    source_file: String,
    status: &'static str,
}

impl<'a> From<&'a CreationResult> for Row<'a> {
    fn from(result: &'a CreationResult) -> Self {
        Self {
            source_key: result.source_key(),
            target_name: result.target_name(),
            secret_id: result.outcome().secret_id(),
            source_file: result.source_file().display().to_string(),
            status: match result.outcome() {
                Outcome::Created(_) => "created",
                Outcome::Failed(_) => "failed",
            },
        }
    }
}

/// Render results as CSV with a header row.
pub fn render_csv(results: &[CreationResult]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER);
    for result in results {
        let file = result.source_file().display().to_string();
        push_row(
            &mut out,
            [
                result.source_key(),
                result.target_name(),
                result.outcome().secret_id().unwrap_or(""),
                file.as_str(),
            ],
        );
    }
    out
}

/// Render results as a pretty JSON array.
///
/// # Errors
///
/// Returns `ReportError::Serialize` if serialization fails.
pub fn render_json(results: &[CreationResult]) -> Result<String, ReportError> {
    let rows: Vec<Row<'_>> = results.iter().map(Row::from).collect();
    let mut json = serde_json::to_string_pretty(&rows)?;
    json.push('\n');
    Ok(json)
}

fn push_row(out: &mut String, fields: [&str; 4]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
