//! Parallel migration of a set of files.
//!
//! Every file is an independent task on a dedicated rayon pool. A task reads
//! the file, threads it through the selected migrations and writes it back
//! only when something changed. A failing file is logged and counted; it never
//! stops the other tasks and is never partially written.

use crate::config::{resolve_worker_count, MigrateConfig};
use crate::core::{MigrationError, Result};
use crate::io::walker::find_source_files;
use crate::io::{FileSystem, RealFileSystem};
use crate::migrations::{applicable, apply_all, Migration, MigrationContext};
use crate::observability::{
    increment_processed, set_current_file, set_phase, set_progress, MigrationPhase,
};
use crate::progress::{ProgressConfig, ProgressManager, TEMPLATE_MIGRATION};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, error, info, info_span};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker threads, 0 = available parallelism
    pub threads: usize,
    pub dry_run: bool,
    pub progress: ProgressConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Unchanged,
    Changed,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    pub bytes: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub discovered: usize,
    pub changed: usize,
    pub failed: usize,
    pub bytes_read: usize,
    #[serde(skip)]
    pub elapsed: Duration,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<FileOutcome>, elapsed: Duration) -> Self {
        let count = |wanted: fn(&FileStatus) -> bool| {
            outcomes.iter().filter(|o| wanted(&o.status)).count()
        };
        Self {
            discovered: outcomes.len(),
            changed: count(|s| matches!(s, FileStatus::Changed)),
            failed: count(|s| matches!(s, FileStatus::Failed { .. })),
            bytes_read: outcomes.iter().map(|o| o.bytes).sum(),
            elapsed,
            outcomes,
        }
    }

    pub fn unchanged(&self) -> usize {
        self.discovered - self.changed - self.failed
    }

    pub fn files_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.discovered as f64 / secs
        } else {
            0.0
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Failed { reason } => Some((o.path.as_path(), reason.as_str())),
            _ => None,
        })
    }
}

/// Applies a fixed list of migrations to files through a [`FileSystem`].
pub struct BatchProcessor<F: FileSystem> {
    fs: F,
    migrations: Vec<Migration>,
    ctx: MigrationContext,
    options: BatchOptions,
}

impl<F: FileSystem> BatchProcessor<F> {
    pub fn new(fs: F, migrations: Vec<Migration>, ctx: MigrationContext, options: BatchOptions) -> Self {
        Self {
            fs,
            migrations,
            ctx,
            options,
        }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Migrate one file. Errors are folded into the outcome.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let _span = debug_span!("rewrite", path = %path.display()).entered();
        let _file = set_current_file(path);
        let mut bytes = 0;

        let status = match self.migrate(path, &mut bytes) {
            Ok(true) => FileStatus::Changed,
            Ok(false) => FileStatus::Unchanged,
            Err(err) => {
                error!(path = %path.display(), error = %err, "migration failed, file left untouched");
                FileStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        increment_processed();

        FileOutcome {
            path: path.to_path_buf(),
            status,
            bytes,
        }
    }

    fn migrate(&self, path: &Path, bytes: &mut usize) -> Result<bool> {
        let source = self.fs.read_to_string(path)?;
        *bytes = source.len();

        let result = {
            let _phase = set_phase(MigrationPhase::Rewriting);
            apply_all(&self.migrations, &source, &self.ctx)?
        };
        if !result.changed {
            return Ok(false);
        }

        if self.options.dry_run {
            debug!(path = %path.display(), "dry run, not writing");
        } else {
            let _phase = set_phase(MigrationPhase::Writing);
            self.fs.write(path, &result.content)?;
        }
        Ok(true)
    }

    /// Migrate `files` on a pool of `options.threads` workers.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchReport> {
        let workers = resolve_worker_count(self.options.threads);
        let _span = info_span!("migration_batch", files = files.len(), workers).entered();
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("syncmigrate-worker-{i}"))
            .build()
            .map_err(|e| MigrationError::Concurrency(e.to_string()))?;

        let manager = ProgressManager::new(self.options.progress.clone());
        let bar = manager.create_bar(files.len() as u64, TEMPLATE_MIGRATION);
        bar.set_message(if self.options.dry_run {
            "Checking"
        } else {
            "Migrating"
        });
        set_progress(0, files.len());

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .progress_with(bar.clone())
                .map(|path| self.process_file(path))
                .collect()
        });
        bar.finish_and_clear();

        let report = BatchReport::from_outcomes(outcomes, start.elapsed());
        info!(
            discovered = report.discovered,
            changed = report.changed,
            failed = report.failed,
            bytes = report.bytes_read,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch finished"
        );
        Ok(report)
    }
}

/// Discover the files selected by `config` and migrate them on disk.
pub fn run_batch(config: &MigrateConfig, options: BatchOptions) -> Result<BatchReport> {
    config.validate()?;
    let ctx = MigrationContext {
        indent: config.offset,
        locker: config.locker_kind()?,
    };
    let migrations = applicable(config.start_java_version, config.target_java_version);
    if migrations.is_empty() {
        info!(
            start = config.start_java_version,
            target = config.target_java_version,
            "no migration applies to this version range"
        );
    }

    let files = {
        let _phase = set_phase(MigrationPhase::FileDiscovery);
        let spinner = ProgressManager::new(options.progress.clone())
            .create_spinner("Discovering source files");
        let started = Instant::now();
        let files = find_source_files(config)?;
        spinner.finish_and_clear();
        if options.progress.verbosity > 0 {
            info!(
                files = files.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "file discovery finished"
            );
        }
        files
    };
    BatchProcessor::new(RealFileSystem::new(), migrations, ctx, options).run(&files)
}
