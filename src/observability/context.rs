//! Thread-local context tracking for crash reports.
//!
//! Each rayon worker records the phase and file it is working on so a panic
//! report can name them. Batch-wide progress lives in atomic counters.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<MigrationContextSnapshot> =
        const { RefCell::new(MigrationContextSnapshot::new()) };
}

/// What the current thread was doing.
#[derive(Debug, Clone, Default)]
pub struct MigrationContextSnapshot {
    pub phase: Option<MigrationPhase>,
    pub current_file: Option<PathBuf>,
}

impl MigrationContextSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPhase {
    /// Loading and validating configuration
    Configuration,
    /// Walking the starting paths
    FileDiscovery,
    /// Rewriting file contents
    Rewriting,
    /// Persisting changed files
    Writing,
}

impl std::fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::FileDiscovery => write!(f, "file_discovery"),
            Self::Rewriting => write!(f, "rewriting"),
            Self::Writing => write!(f, "writing"),
        }
    }
}

/// Restores the previous context on drop.
pub struct ContextGuard {
    previous: MigrationContextSnapshot,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut MigrationContextSnapshot)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: MigrationPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> MigrationContextSnapshot {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = MigrationContextSnapshot::new();
    });
}
