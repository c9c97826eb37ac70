//! Scan command - discovery only, nothing is decrypted.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::config::{FileConfig, Overrides, Settings};
use crate::core::discovery;
use crate::core::naming;
use crate::error::Result;

/// List the secret files under `root` and the target prefix each would use.
pub fn execute(
    root: PathBuf,
    environment: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let file = FileConfig::discover(config.as_deref())?;
    let settings = Settings::resolve(
        Overrides {
            root,
            environment,
            dry_run: true,
            ..Overrides::default()
        },
        file,
    )?;

    let found = discovery::discover(&settings.root, &settings.rules, &settings.environment)?;

    if found.files.is_empty() {
        output::dimmed("no secret files found");
    } else {
        output::section("Secret files");
        for file in &found.files {
            let prefix = naming::target_name("", file, &settings.environment);
            output::list_item(&format!(
                "{}  {}  {}*",
                output::path(file.path().display()),
                file.kind(),
                prefix
            ));
        }
    }

    if !found.skipped.is_empty() {
        output::section("Skipped");
        for skipped in &found.skipped {
            output::list_item(&format!("{}  {}", skipped.path.display(), skipped.reason));
        }
    }

    println!();
    output::success(&format!("{} file(s) found", found.files.len()));
    Ok(())
}
