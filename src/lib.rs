//! Rewrites `synchronized` Java methods into explicit `java.util.concurrent`
//! locks so they stop pinning virtual threads to their carrier.

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod migrations;
pub mod observability;
pub mod progress;
pub mod synchronized;

pub use crate::batch::{run_batch, BatchOptions, BatchProcessor, BatchReport, FileOutcome, FileStatus};
pub use crate::config::{load_config, MigrateConfig, Metas};
pub use crate::core::{Content, MigrationError, Result};
pub use crate::migrations::{applicable, apply_all, Migration, MigrationContext};
pub use crate::synchronized::{
    first_position, positions, rewrite, LockerKind, Occurrence, OccurrenceKind,
    SynchronizedRewriter,
};
