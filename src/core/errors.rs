//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for syncmigrate operations
#[derive(Debug, Error)]
pub enum MigrationError {
    /// No `{` follows a method-level `synchronized` modifier
    #[error("Structural error: no opening brace after offset {offset}")]
    OpenBraceNotFound { offset: usize },

    /// The method body starting after `offset` never closes
    #[error("Structural error: no matching closing brace after offset {offset}")]
    CloseBraceNotFound { offset: usize },

    /// A `synchronized` match is followed by nothing but whitespace
    #[error("Structural error: cannot classify `synchronized` at offset {offset}")]
    UnclassifiableOccurrence { offset: usize },

    /// A `package` declaration without its terminating `;`
    #[error("Structural error: package declaration at offset {offset} has no terminating ';'")]
    PackageTerminatorMissing { offset: usize },

    /// Unknown value for the locker kind
    #[error("Unknown locker kind '{0}', expected ReentrantReadWriteLock or StampedLock")]
    UnknownLocker(String),

    /// File system related errors
    #[error("File system error at {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Worker pool errors
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl MigrationError {
    /// Create a file system error with path context
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True for the errors that signal malformed input rather than an
    /// environment problem. The file is left untouched in both cases.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::OpenBraceNotFound { .. }
                | Self::CloseBraceNotFound { .. }
                | Self::UnclassifiableOccurrence { .. }
                | Self::PackageTerminatorMissing { .. }
        )
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
