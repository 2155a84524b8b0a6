//! Migration of `synchronized` methods to explicit lock objects.
//!
//! The engine works on raw source text, without a Java parser:
//!
//! - `lexical`: comment and string-literal context of an offset
//! - `scanner`: finds and classifies every `synchronized` token
//! - `locator`: method body boundaries by brace depth
//! - `insertion`: where generated fields go, respecting annotations and Javadoc
//! - `locker`: text generators for each supported lock primitive
//! - `rewriter`: the per-file scan and splice loop
//!
//! `synchronized (expr) { ... }` monitor blocks are recognized but never
//! rewritten.

pub mod insertion;
pub mod lexical;
pub mod locator;
pub mod locker;
pub mod rewriter;
pub mod scanner;

pub use locker::{LockerKind, LOCKER_META_KEY};
pub use rewriter::{rewrite, SynchronizedRewriter, FIRST_LOCK_INDEX};
pub use scanner::{first_position, positions, Occurrence, OccurrenceKind};
