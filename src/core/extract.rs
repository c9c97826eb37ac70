//! Structured data extraction.
//!
//! Parses decrypted YAML into a [`StructuredValue`] tree and flattens it into
//! leaf secrets with a single depth-first visitor:
//!
//! - mapping entries recurse with `prefix.key`
//! - null leaves are skipped (disabled fields are not secrets)
//! - scalars and whole lists become one secret each; lists are rendered as
//!   compact JSON
//!
//! Emission order is traversal order, which follows document order.

use std::collections::HashSet;

use tracing::trace;

use crate::core::domain::{ExtractedSecret, SecretFile, SecretValue, StructuredValue};
use crate::error::ParseError;

/// Parse decrypted plaintext into a document tree.
///
/// # Errors
///
/// Returns `ParseError::Syntax` if the text is not valid YAML.
pub fn parse(plaintext: &str, file: &SecretFile) -> Result<StructuredValue, ParseError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(plaintext).map_err(|e| ParseError::Syntax {
            path: file.path().to_path_buf(),
            reason: scrub_location(&e),
        })?;
    Ok(StructuredValue::from_yaml(yaml))
}

/// Flatten decrypted plaintext into leaf secrets.
///
/// # Errors
///
/// Returns `ParseError` if the text is not valid YAML, if the top level is
/// not a mapping, or if two paths flatten to the same key.
pub fn extract<'f>(
    plaintext: &str,
    file: &'f SecretFile,
) -> Result<Vec<ExtractedSecret<'f>>, ParseError> {
    let document = parse(plaintext, file)?;
    flatten(document, file)
}

/// Flatten an already parsed document.
pub fn flatten(
    document: StructuredValue,
    file: &SecretFile,
) -> Result<Vec<ExtractedSecret<'_>>, ParseError> {
    let entries = match document {
        StructuredValue::Map(entries) => entries,
        other => {
            return Err(ParseError::NotAMapping {
                path: file.path().to_path_buf(),
                found: other.kind_name(),
            })
        }
    };

    let mut out = Vec::new();
    visit_map(entries, None, file, &mut out)?;

    let mut seen = HashSet::with_capacity(out.len());
    for secret in &out {
        if !seen.insert(secret.key()) {
            return Err(ParseError::DuplicateKey {
                path: file.path().to_path_buf(),
                key: secret.key().to_string(),
            });
        }
    }

    trace!(path = %file.path().display(), secrets = out.len(), "flattened");
    Ok(out)
}

fn visit_map<'f>(
    entries: Vec<(String, StructuredValue)>,
    prefix: Option<&str>,
    file: &'f SecretFile,
    out: &mut Vec<ExtractedSecret<'f>>,
) -> Result<(), ParseError> {
    for (key, value) in entries {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };
        visit(value, path, file, out)?;
    }
    Ok(())
}

fn visit<'f>(
    value: StructuredValue,
    path: String,
    file: &'f SecretFile,
    out: &mut Vec<ExtractedSecret<'f>>,
) -> Result<(), ParseError> {
    match value {
        StructuredValue::Null => {
            trace!(key = %path, "null leaf skipped");
        }
        StructuredValue::Map(entries) => return visit_map(entries, Some(&path), file, out),
        StructuredValue::Scalar(text) => {
            out.push(ExtractedSecret::new(path, SecretValue::from(text), file));
        }
        list @ StructuredValue::List(_) => {
            let text = list.to_compact_json().map_err(|e| ParseError::Render {
                path: file.path().to_path_buf(),
                key: path.clone(),
                reason: e.to_string(),
            })?;
            out.push(ExtractedSecret::new(path, SecretValue::from(text), file));
        }
    }
    Ok(())
}

/// YAML errors can quote the offending input; keep only the position.
fn scrub_location(err: &serde_yaml::Error) -> String {
    match err.location() {
        Some(loc) => format!("syntax error at line {} column {}", loc.line(), loc.column()),
        None => "syntax error".to_string(),
    }
}
