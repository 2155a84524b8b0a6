//! Implementations of [`FileSystem`]: the real disk and an in-memory map.

use crate::core::{MigrationError, Result};
use crate::io::traits::FileSystem;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Production file system implementation.
///
/// Writes are flushed to disk before returning so a finished batch leaves
/// every changed file durable.
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| MigrationError::file_system(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let write = || -> std::io::Result<()> {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()
        };
        write().map_err(|e| MigrationError::file_system(path, e))
    }
}

/// In-memory file system for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), content.into());
        }
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.read().ok()?.get(path).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.get(path).ok_or_else(|| {
            MigrationError::file_system(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let mut files = self
            .files
            .write()
            .map_err(|e| MigrationError::Concurrency(e.to_string()))?;
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
