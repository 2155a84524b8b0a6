//! Crash reports, per-thread migration context and log setup.
//!
//! ```ignore
//! use syncmigrate::observability::{set_current_file, set_phase, MigrationPhase};
//!
//! let _phase = set_phase(MigrationPhase::Rewriting);
//! for file in files {
//!     let _file = set_current_file(&file);
//!     // a panic here reports the phase and the file
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file, set_phase,
    set_progress, ContextGuard, MigrationContextSnapshot, MigrationPhase,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::init_tracing;
