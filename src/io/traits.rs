//! I/O abstraction used by the batch processor.
//!
//! The rewrite engine itself never touches the disk; everything that reads
//! or persists a source file goes through [`FileSystem`], so batch runs can be
//! exercised against an in-memory implementation.

use crate::core::Result;
use std::path::Path;

/// File system operations needed to migrate a file.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::FileSystem` if the file is missing, not
    /// readable or not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace the file's contents, truncating what was there.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::FileSystem` if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}
