use crate::batch::{run_batch, BatchOptions, BatchReport};
use crate::config::{load_config, MigrateConfig};
use crate::observability::{set_phase, MigrationPhase};
use crate::progress::ProgressConfig;
use crate::synchronized::{LockerKind, LOCKER_META_KEY};
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

/// Command-line values for `migrate`; `None`/empty fields keep the file's value.
#[derive(Debug, Clone, Default)]
pub struct MigrateArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub threads: Option<usize>,
    pub indent: Option<usize>,
    pub locker: Option<LockerKind>,
    pub start_version: Option<u32>,
    pub target_version: Option<u32>,
    pub exclude: Vec<String>,
    pub metas: Vec<(String, String)>,
    pub dry_run: bool,
    pub quiet: bool,
    pub verbosity: u8,
}

impl MigrateArgs {
    /// Layer the command-line values over `config`.
    pub fn apply_overrides(&self, mut config: MigrateConfig) -> MigrateConfig {
        if !self.paths.is_empty() {
            config.starting_paths = self.paths.clone();
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(indent) = self.indent {
            config.offset = indent;
        }
        if let Some(start) = self.start_version {
            config.start_java_version = start;
        }
        if let Some(target) = self.target_version {
            config.target_java_version = target;
        }
        config.exclude_paths.extend(self.exclude.iter().cloned());
        for (key, value) in self.metas.iter().rev() {
            config.metas.push_front(key.clone(), value.clone());
        }
        if let Some(locker) = self.locker {
            config.metas.push_front(LOCKER_META_KEY, locker.class_name());
        }
        config
    }

    pub fn resolve_config(&self) -> Result<MigrateConfig> {
        let _phase = set_phase(MigrationPhase::Configuration);
        let config = load_config(self.config.as_deref())
            .context("Failed to load configuration")?;
        let config = self.apply_overrides(config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

pub fn handle_migrate(args: MigrateArgs) -> Result<BatchReport> {
    let config = args.resolve_config()?;
    log::info!(
        "Migrating {:?} from Java {} to {} with {}",
        config.starting_paths(),
        config.start_java_version,
        config.target_java_version,
        config.locker_kind()?
    );

    let options = BatchOptions {
        threads: config.worker_count(),
        dry_run: args.dry_run,
        progress: ProgressConfig::from_env(args.quiet, args.verbosity),
    };
    let report = run_batch(&config, options)?;

    if !args.quiet {
        print_summary(&report, args.dry_run);
    }
    if !report.is_success() {
        anyhow::bail!("{} file(s) failed to migrate", report.failed);
    }
    Ok(report)
}

fn print_summary(report: &BatchReport, dry_run: bool) {
    for (path, reason) in report.failures() {
        eprintln!("{} {}: {}", "failed".red().bold(), path.display(), reason);
    }

    let verb = if dry_run { "would change" } else { "changed" };
    println!(
        "{} {} files, {} {}, {} unchanged, {} failed ({} bytes in {:.2?}, {:.1} files/sec)",
        "Processed".green().bold(),
        report.discovered,
        report.changed.to_string().cyan(),
        verb,
        report.unchanged(),
        if report.failed > 0 {
            report.failed.to_string().red()
        } else {
            report.failed.to_string().normal()
        },
        report.bytes_read,
        report.elapsed,
        report.files_per_sec()
    );
}
