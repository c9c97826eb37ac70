//! Migration orchestrator.
//!
//! Drives each discovered file through decrypt -> extract -> name -> create,
//! isolating failures:
//!
//! - decryption and parse errors skip the rest of that file
//! - naming collisions and creation errors skip only that secret
//!
//! Only precondition failures (missing tools, rejected credentials, an
//! unreadable root) abort the run, and always before the first file.
//!
//! A run has three passes. Decryption and extraction, then creation, run on
//! a bounded pool of scoped threads that hand results back over a channel.
//! Between them, target names are claimed on the calling thread in discovery
//! order, so the first claimant of a name never depends on scheduling and
//! the report reads the same as a sequential run.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use tracing::{debug, warn};

use crate::core::decrypt::{CredentialSource, DecryptionProvider};
use crate::core::discovery::{self, Discovered, Rules};
use crate::core::domain::{
    CreationResult, ErrorRecord, ExtractedSecret, FileOutcome, MigrationReport, NamedSecret,
    Outcome, RunInfo, SecretFile, Stage,
};
use crate::core::extract;
use crate::core::naming::{self, NameRegistry};
use crate::core::store::{DryRun, SecretStore};
use crate::core::types::ProjectId;
use crate::error::Result;

static DRY_RUN: DryRun = DryRun;

/// Per-run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub environment: String,
    pub project_id: Option<ProjectId>,
    pub dry_run: bool,
    pub jobs: usize,
}

/// Secrets of one file, or the outcome that ended it early.
type Opened<'f> = std::result::Result<Vec<ExtractedSecret<'f>>, FileOutcome>;

/// A file after naming.
enum Pending<'f> {
    Failed(FileOutcome),
    Ready {
        file: &'f SecretFile,
        steps: Vec<Step<'f>>,
    },
}

/// One secret after naming, in document order.
enum Step<'f> {
    Create(NamedSecret<'f>),
    Collision(ErrorRecord),
}

/// Sequences one migration run.
pub struct Migrator<'a> {
    decryptor: &'a dyn DecryptionProvider,
    store: &'a dyn SecretStore,
    credential: CredentialSource,
    options: Options,
}

impl<'a> Migrator<'a> {
    /// Create a migrator.
    ///
    /// `store` is the live store; in dry-run mode it is never called.
    /// Prompting for credentials forces a single job.
    pub fn new(
        decryptor: &'a dyn DecryptionProvider,
        store: &'a dyn SecretStore,
        credential: CredentialSource,
        mut options: Options,
    ) -> Self {
        options.jobs = options.jobs.max(1);
        if credential.is_interactive() && options.jobs > 1 {
            warn!(jobs = options.jobs, "interactive credentials, running single-threaded");
            options.jobs = 1;
        }
        Self {
            decryptor,
            store,
            credential,
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Discover, check preconditions, and migrate everything under `root`.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the root cannot be read, a required tool is
    /// missing, or the store rejects the credential. Per-file and per-secret
    /// problems end up in the report instead.
    pub fn run(&self, root: &Path, rules: &Rules) -> Result<MigrationReport> {
        self.check_store()?;
        let discovered = discovery::discover(root, rules, &self.options.environment)?;
        self.check_decryptors(&discovered)?;
        Ok(self.migrate(root, discovered))
    }

    /// Store checks, done once before anything else in live mode.
    pub fn check_store(&self) -> Result<()> {
        if self.options.dry_run {
            return Ok(());
        }
        debug!(store = self.store.name(), "checking secret store");
        self.store.ensure_available()?;
        self.store.authenticate(self.options.project_id.as_deref())?;
        Ok(())
    }

    /// Make sure every discovered container kind can be decrypted.
    pub fn check_decryptors(&self, discovered: &Discovered) -> Result<()> {
        for kind in discovered.kinds() {
            self.decryptor.ensure_available(kind)?;
        }
        Ok(())
    }

    /// Process already discovered files. Never fails.
    pub fn migrate(&self, root: &Path, discovered: Discovered) -> MigrationReport {
        let mut report = MigrationReport::new(RunInfo {
            root: root.to_path_buf(),
            environment: self.options.environment.clone(),
            project_id: self.options.project_id.clone(),
            dry_run: self.options.dry_run,
            started_at: Utc::now(),
        });
        report.record_skipped(discovered.skipped);

        debug!(
            files = discovered.files.len(),
            jobs = self.options.jobs,
            dry_run = self.options.dry_run,
            "migrating"
        );

        let files = discovered.files.as_slice();
        let opened = self.in_order(files, |file| self.open(file));

        let mut registry = NameRegistry::new();
        let pending: Vec<Pending<'_>> = files
            .iter()
            .zip(opened)
            .map(|(file, opened)| match opened {
                Ok(secrets) => self.claim(file, secrets, &mut registry),
                Err(outcome) => Pending::Failed(outcome),
            })
            .collect();

        for outcome in self.in_order(pending.as_slice(), |pending| self.create(pending)) {
            report.absorb(outcome);
        }
        report.finish();

        debug!(
            processed = report.files_processed(),
            discovered = report.secrets_discovered(),
            created = report.secrets_created(),
            errors = report.errors().len(),
            "migration finished"
        );
        report
    }

    /// Apply `work` to every item on up to `jobs` scoped threads. Results
    /// come back in item order.
    fn in_order<'s, T, R, F>(&self, items: &'s [T], work: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&'s T) -> R + Sync,
    {
        let workers = self.options.jobs.min(items.len());
        if workers <= 1 {
            return items.iter().map(work).collect();
        }

        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let work = &work;
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(item) = items.get(index) else {
                        break;
                    };
                    if tx.send((index, work(item))).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            let mut slots: Vec<Option<R>> = items.iter().map(|_| None).collect();
            for (index, result) in rx {
                slots[index] = Some(result);
            }
            slots.into_iter().flatten().collect()
        })
    }

    fn active_store(&self) -> &dyn SecretStore {
        if self.options.dry_run {
            &DRY_RUN
        } else {
            self.store
        }
    }

    /// Decrypt and extract one file.
    fn open<'f>(&self, file: &'f SecretFile) -> Opened<'f> {
        debug!(path = %file.path().display(), kind = %file.kind(), "processing file");

        let plaintext = match self.decryptor.decrypt(file, &self.credential) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(path = %file.path().display(), "decryption failed, skipping file");
                return Err(FileOutcome::failed(ErrorRecord::file(
                    Stage::Decrypt,
                    file.path(),
                    e,
                )));
            }
        };

        extract::extract(plaintext.expose(), file).map_err(|e| {
            warn!(path = %file.path().display(), "unusable document, skipping file");
            FileOutcome::failed(ErrorRecord::file(Stage::Parse, file.path(), e))
        })
    }

    /// Name every secret of `file` and claim the names.
    fn claim<'f>(
        &self,
        file: &'f SecretFile,
        secrets: Vec<ExtractedSecret<'f>>,
        registry: &mut NameRegistry,
    ) -> Pending<'f> {
        let steps = secrets
            .into_iter()
            .map(|secret| {
                let target = naming::target_name(secret.key(), file, &self.options.environment);
                let named = NamedSecret::new(secret, target);
                let key = named.extracted().key();
                match registry.claim(named.target(), file.path(), key) {
                    Ok(()) => Step::Create(named),
                    Err(e) => {
                        warn!(name = %named.target(), "target name collision");
                        Step::Collision(ErrorRecord::secret(Stage::Naming, file.path(), key, e))
                    }
                }
            })
            .collect();
        Pending::Ready { file, steps }
    }

    /// Create the claimed secrets of one file.
    fn create(&self, pending: &Pending<'_>) -> FileOutcome {
        let (file, steps) = match pending {
            Pending::Failed(outcome) => return outcome.clone(),
            Pending::Ready { file, steps } => (file, steps),
        };

        let mut outcome = FileOutcome {
            processed: true,
            discovered: steps.len(),
            ..FileOutcome::default()
        };

        let store = self.active_store();
        let project_id = self.options.project_id.as_deref();

        for step in steps {
            let named = match step {
                Step::Create(named) => named,
                Step::Collision(record) => {
                    outcome.errors.push(record.clone());
                    continue;
                }
            };
            let key = named.extracted().key();

            match store.create_secret(named.target(), named.extracted().value(), project_id) {
                Ok(id) => {
                    debug!(name = %named.target(), "created");
                    outcome.push_result(CreationResult::new(named, Outcome::Created(id)));
                }
                Err(e) => {
                    warn!(name = %named.target(), "creation failed");
                    outcome
                        .errors
                        .push(ErrorRecord::secret(Stage::Create, file.path(), key, &e));
                    outcome.push_result(CreationResult::new(named, Outcome::Failed(e.to_string())));
                }
            }
        }

        outcome
    }
}
