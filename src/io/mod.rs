pub mod real;
pub mod traits;
pub mod walker;

pub use real::{MemoryFileSystem, RealFileSystem};
pub use traits::FileSystem;
pub use walker::FileWalker;

use crate::core::{MigrationError, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MigrationError::file_system(path, e))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| MigrationError::file_system(path, e))
}
