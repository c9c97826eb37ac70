//! Run configuration.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags (and their environment variables), an optional TOML file, and
//! built-in defaults. A leading `~` in `password_file` or `output_dir` is
//! expanded to the home directory.
//!
//! ```toml
//! environment = "staging"
//! output_dir = "reports"
//! timeout_secs = 120
//! jobs = 4
//! password_file = "~/.vault-pass"
//! patterns = ["vault.yml", "secrets.yml"]
//! template_suffixes = [".example"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::core::discovery::Rules;
use crate::core::types::ProjectId;
use crate::error::{ConfigError, Result};

/// Contents of the optional config file. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub environment: Option<String>,
    pub project_id: Option<ProjectId>,
    pub output_dir: Option<PathBuf>,
    pub password_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
    pub patterns: Option<Vec<String>>,
    pub template_suffixes: Option<Vec<String>>,
}

impl FileConfig {
    /// Default location: `<config dir>/secretlift/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_FILE))
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Load `explicit` if given, else the default path if it exists, else
    /// an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: PathBuf,
    pub project_id: Option<ProjectId>,
    pub environment: Option<String>,
    pub dry_run: bool,
    pub password_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub json_mapping: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub project_id: Option<ProjectId>,
    pub environment: String,
    pub dry_run: bool,
    pub password_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub jobs: usize,
    pub timeout: Duration,
    pub json_mapping: bool,
    pub rules: Rules,
}

impl Settings {
    /// Merge command-line overrides over the config file and defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for out-of-range values and
    /// `ConfigError::MissingProjectId` for a live run without a project.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self> {
        let defaults = Rules::default();
        let settings = Self {
            root: overrides.root,
            project_id: overrides.project_id.or(file.project_id),
            environment: overrides
                .environment
                .or(file.environment)
                .unwrap_or_else(|| constants::DEFAULT_ENVIRONMENT.to_string()),
            dry_run: overrides.dry_run,
            password_file: overrides
                .password_file
                .or(file.password_file)
                .map(expand_home),
            output_dir: expand_home(
                overrides
                    .output_dir
                    .or(file.output_dir)
                    .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_DIR)),
            ),
            jobs: overrides.jobs.or(file.jobs).unwrap_or(1),
            timeout: Duration::from_secs(
                overrides
                    .timeout_secs
                    .or(file.timeout_secs)
                    .unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            json_mapping: overrides.json_mapping,
            rules: Rules {
                patterns: file.patterns.unwrap_or(defaults.patterns),
                template_suffixes: file.template_suffixes.unwrap_or(defaults.template_suffixes),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check ranges and required combinations.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_tag(&self.environment) {
            return Err(ConfigError::InvalidValue {
                field: "environment",
                reason: format!(
                    "'{}' must be non-empty and use only letters, digits, '-' or '_'",
                    self.environment
                ),
            }
            .into());
        }

        if self.jobs == 0 || self.jobs > constants::MAX_JOBS {
            return Err(ConfigError::InvalidValue {
                field: "jobs",
                reason: format!("must be between 1 and {}", constants::MAX_JOBS),
            }
            .into());
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: "must be at least 1 second".to_string(),
            }
            .into());
        }

        if self.rules.patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "patterns",
                reason: "at least one file pattern is required".to_string(),
            }
            .into());
        }

        if !self.dry_run && self.project_id.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingProjectId.into());
        }

        Ok(())
    }
}

/// Replace a leading `~` component with the home directory, if known.
fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path,
    }
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
