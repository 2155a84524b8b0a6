//! Registry of whole-file migrations, keyed by the Java version that made
//! each one worthwhile.

use crate::core::{Content, Result};
use crate::synchronized::{LockerKind, SynchronizedRewriter};
use serde::Serialize;
use std::fmt;

/// Settings shared by every migration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationContext {
    pub indent: usize,
    pub locker: LockerKind,
}

impl Default for MigrationContext {
    fn default() -> Self {
        Self {
            indent: 4,
            locker: LockerKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Migration {
    /// `synchronized` methods to explicit locks, which keeps virtual threads
    /// from pinning their carrier
    SynchronizedToLock,
}

impl Migration {
    pub const ALL: [Migration; 1] = [Migration::SynchronizedToLock];

    pub fn version(self) -> u32 {
        match self {
            Self::SynchronizedToLock => 21,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SynchronizedToLock => "synchronized-to-lock",
        }
    }

    pub fn apply(self, content: &str, ctx: &MigrationContext) -> Result<Content> {
        match self {
            Self::SynchronizedToLock => {
                SynchronizedRewriter::new(ctx.locker, ctx.indent).rewrite(content)
            }
        }
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Java {})", self.name(), self.version())
    }
}

/// Migrations with `start < version <= target`, oldest first.
pub fn applicable(start: u32, target: u32) -> Vec<Migration> {
    let mut selected: Vec<Migration> = Migration::ALL
        .into_iter()
        .filter(|m| start < m.version() && m.version() <= target)
        .collect();
    selected.sort_by_key(|m| m.version());
    selected
}

/// Thread `content` through each migration in order.
pub fn apply_all(migrations: &[Migration], content: &str, ctx: &MigrationContext) -> Result<Content> {
    migrations
        .iter()
        .try_fold(Content::unchanged(content), |acc, migration| {
            let next = migration.apply(&acc.content, ctx)?;
            Ok(acc.then(next))
        })
}
