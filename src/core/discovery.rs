//! Secret file discovery and classification.
//!
//! Walks a root directory, keeps files whose names match a secret-file
//! pattern, drops template counterparts, and classifies the rest by their
//! header. Only the first few bytes of each candidate are read.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::constants;
use crate::core::domain::{ContainerKind, SecretFile, SkippedFile};
use crate::error::{ConfigError, Result};

/// File name rules for discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// File name endings that mark a secret file
    pub patterns: Vec<String>,
    /// Suffixes marking unencrypted templates
    pub template_suffixes: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            patterns: constants::SECRET_FILE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            template_suffixes: constants::TEMPLATE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Rules {
    /// Pattern matched by `name`, longest first.
    fn matched_pattern(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .filter(|p| name.ends_with(p.as_str()))
            .max_by_key(|p| p.len())
            .map(String::as_str)
    }

    /// `api_vault.yml.example` and `api.example.vault.yml` are both templates.
    fn is_template(&self, name: &str) -> bool {
        self.template_suffixes.iter().any(|suffix| {
            name.ends_with(suffix.as_str()) || name.contains(&format!("{}.", suffix))
        })
    }
}

/// Result of a discovery pass.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Encrypted files in lexicographic path order
    pub files: Vec<SecretFile>,
    /// Name matches that are not encrypted containers
    pub skipped: Vec<SkippedFile>,
}

impl Discovered {
    /// Distinct container kinds present, for dependency checks.
    pub fn kinds(&self) -> Vec<ContainerKind> {
        let mut kinds: Vec<ContainerKind> = self.files.iter().map(SecretFile::kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

/// Find encrypted secret files under `root`.
///
/// # Errors
///
/// Returns `ConfigError::RootUnreadable` if `root` itself cannot be listed.
/// Unreadable subdirectories are skipped with a warning.
pub fn discover(root: &Path, rules: &Rules, environment: &str) -> Result<Discovered> {
    debug!(root = %root.display(), "discovering secret files");

    fs::read_dir(root).map_err(|source| ConfigError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut candidates = walk(root, rules);
    candidates.sort();

    let mut discovered = Discovered::default();
    for (path, pattern) in candidates {
        match classify(&path) {
            Ok(Some(kind)) => {
                let service = service_name(&path, &pattern);
                debug!(path = %path.display(), service = %service, kind = %kind, "secret file");
                discovered
                    .files
                    .push(SecretFile::new(path, service, environment, kind));
            }
            Ok(None) => {
                warn!(path = %path.display(), "no encrypted header, skipping");
                discovered.skipped.push(SkippedFile {
                    path,
                    reason: "not an encrypted container".to_string(),
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable, skipping");
                discovered.skipped.push(SkippedFile {
                    path,
                    reason: format!("unreadable: {}", e),
                });
            }
        }
    }

    debug!(
        files = discovered.files.len(),
        skipped = discovered.skipped.len(),
        "discovery complete"
    );
    Ok(discovered)
}

/// Collect `(path, matched pattern)` for every non-template file under
/// `root`. Dot-directories are pruned and symlinks are not followed.
fn walk(root: &Path, rules: &Rules) -> Vec<(PathBuf, String)> {
    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    path = %e.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    error = %e,
                    "cannot read entry, skipping"
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if rules.is_template(&name) {
            debug!(path = %entry.path().display(), "template, excluded");
            continue;
        }
        if let Some(pattern) = rules.matched_pattern(&name) {
            out.push((entry.path().to_path_buf(), pattern.to_string()));
        }
    }
    out
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

/// Detect the container format from the leading bytes of `path`.
pub fn classify(path: &Path) -> std::io::Result<Option<ContainerKind>> {
    let mut head = Vec::with_capacity(constants::HEADER_PROBE_LEN);
    File::open(path)?
        .take(constants::HEADER_PROBE_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(classify_header(&head))
}

/// Detect the container format from a header buffer.
pub fn classify_header(head: &[u8]) -> Option<ContainerKind> {
    let trimmed = trim_leading_whitespace(head);
    if trimmed.starts_with(constants::ANSIBLE_VAULT_HEADER) {
        Some(ContainerKind::AnsibleVault)
    } else if trimmed.starts_with(constants::AGE_ARMOR_HEADER)
        || trimmed.starts_with(constants::AGE_BINARY_HEADER)
    {
        Some(ContainerKind::Age)
    } else {
        None
    }
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Derive the service name for a secret file.
///
/// Strips the matched pattern and any trailing separators, then replaces
/// underscores with hyphens. A bare `vault.yml` takes its parent directory's
/// name instead.
pub fn service_name(path: &Path, pattern: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let stem = name
        .strip_suffix(pattern)
        .unwrap_or(&name)
        .trim_end_matches(['_', '.', '-']);

    let base = if stem.is_empty() {
        path.parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "default".to_string())
    } else {
        stem.to_string()
    };

    base.replace('_', "-")
}
