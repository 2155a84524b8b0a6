//! Lock primitives a `synchronized` method can be migrated to.
//!
//! Each variant is a set of pure text generators: field declarations, the
//! import line and the statements opening and closing the `try` wrapper.

use crate::core::MigrationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Meta key selecting the locker kind for a run.
pub const LOCKER_META_KEY: &str = "migrateSynchronizedLocker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LockerKind {
    #[default]
    ReentrantReadWriteLock,
    StampedLock,
}

impl LockerKind {
    pub const ALL: [LockerKind; 2] = [LockerKind::ReentrantReadWriteLock, LockerKind::StampedLock];

    /// Simple name of the Java class.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::ReentrantReadWriteLock => "ReentrantReadWriteLock",
            Self::StampedLock => "StampedLock",
        }
    }

    pub fn import(self) -> &'static str {
        match self {
            Self::ReentrantReadWriteLock => {
                "import java.util.concurrent.locks.ReentrantReadWriteLock;"
            }
            Self::StampedLock => "import java.util.concurrent.locks.StampedLock;",
        }
    }

    /// Variable the generated method body locks and unlocks.
    pub fn lock_handle(self, idx: usize) -> String {
        match self {
            Self::ReentrantReadWriteLock => format!("writeLock{idx}"),
            Self::StampedLock => format!("lock{idx}"),
        }
    }

    /// Field declarations for lock `idx`, preceded by a blank line.
    pub fn declarations(self, idx: usize, indent: usize) -> String {
        let pad = " ".repeat(indent);
        match self {
            Self::ReentrantReadWriteLock => format!(
                "\n\n\
                 {pad}private static final ReentrantReadWriteLock lock{idx} = new ReentrantReadWriteLock();\n\
                 {pad}private static final ReentrantReadWriteLock.ReadLock readLock{idx} = lock{idx}.readLock();\n\
                 {pad}private static final ReentrantReadWriteLock.WriteLock writeLock{idx} = lock{idx}.writeLock();\n"
            ),
            Self::StampedLock => format!(
                "\n\n{pad}private static final StampedLock lock{idx} = new StampedLock();\n"
            ),
        }
    }

    /// Text spliced right after the opening brace of the method body.
    pub fn open_try(self, idx: usize, indent: usize) -> String {
        let double = " ".repeat(indent * 2);
        let handle = self.lock_handle(idx);
        format!("\n{double}{handle}.lock();\n{double}try {{")
    }

    /// Text spliced right before the closing brace of the method body.
    pub fn close_try(self, idx: usize, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let double = " ".repeat(indent * 2);
        let handle = self.lock_handle(idx);
        format!("{pad}}} finally {{\n{double}    {handle}.unlock();\n{double}}}\n{pad}")
    }
}

impl fmt::Display for LockerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for LockerKind {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.class_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MigrationError::UnknownLocker(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reentrant_declarations() {
        assert_eq!(
            LockerKind::ReentrantReadWriteLock.declarations(1, 4),
            "\n\n    private static final ReentrantReadWriteLock lock1 = new ReentrantReadWriteLock();\n    \
             private static final ReentrantReadWriteLock.ReadLock readLock1 = lock1.readLock();\n    \
             private static final ReentrantReadWriteLock.WriteLock writeLock1 = lock1.writeLock();\n"
        );
    }

    #[test]
    fn test_stamped_declarations() {
        assert_eq!(
            LockerKind::StampedLock.declarations(3, 2),
            "\n\n  private static final StampedLock lock3 = new StampedLock();\n"
        );
    }

    #[test]
    fn test_try_wrappers_use_write_lock_for_reentrant() {
        let kind = LockerKind::ReentrantReadWriteLock;
        assert_eq!(kind.open_try(2, 4), "\n        writeLock2.lock();\n        try {");
        assert_eq!(
            kind.close_try(2, 4),
            "    } finally {\n            writeLock2.unlock();\n        }\n    "
        );
    }

    #[test]
    fn test_try_wrappers_use_lock_for_stamped() {
        let kind = LockerKind::StampedLock;
        assert_eq!(kind.open_try(1, 4), "\n        lock1.lock();\n        try {");
        assert_eq!(
            kind.close_try(1, 4),
            "    } finally {\n            lock1.unlock();\n        }\n    "
        );
    }

    #[test]
    fn test_imports() {
        assert_eq!(
            LockerKind::ReentrantReadWriteLock.import(),
            "import java.util.concurrent.locks.ReentrantReadWriteLock;"
        );
        assert_eq!(
            LockerKind::StampedLock.import(),
            "import java.util.concurrent.locks.StampedLock;"
        );
    }

    #[test]
    fn test_parse_locker_kind() {
        assert_eq!("StampedLock".parse::<LockerKind>().unwrap(), LockerKind::StampedLock);
        assert_eq!(
            " reentrantreadwritelock ".parse::<LockerKind>().unwrap(),
            LockerKind::ReentrantReadWriteLock
        );
        assert!(matches!(
            "Semaphore".parse::<LockerKind>(),
            Err(MigrationError::UnknownLocker(_))
        ));
        assert_eq!(LockerKind::default(), LockerKind::ReentrantReadWriteLock);
    }
}
