use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::meta::Metas;
use crate::core::{MigrationError, Result};
use crate::synchronized::{LockerKind, LOCKER_META_KEY};

fn default_start_java_version() -> u32 {
    8
}

fn default_target_java_version() -> u32 {
    21
}

fn default_threads() -> usize {
    4
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

fn default_offset() -> usize {
    4
}

fn default_file_mask() -> String {
    ".java".to_string()
}

/// Directory scanned when no starting path is configured.
pub const DEFAULT_STARTING_PATH: &str = "src";

/// Root configuration structure for syncmigrate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MigrateConfig {
    /// Migrations introduced after this Java version are applied
    #[serde(default = "default_start_java_version")]
    pub start_java_version: u32,

    /// Migrations introduced up to and including this Java version are applied
    #[serde(default = "default_target_java_version")]
    pub target_java_version: u32,

    /// Worker threads for the batch run (0 = available parallelism)
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Charset of the source files
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Number of spaces of one indentation level in generated code
    #[serde(default = "default_offset")]
    pub offset: usize,

    /// File-name suffix selecting the files to migrate
    #[serde(default = "default_file_mask")]
    pub file_mask: String,

    /// Directories to walk
    #[serde(default)]
    pub starting_paths: Vec<PathBuf>,

    /// Glob patterns of files to leave alone
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Dot-separated packages under `src_path` to leave alone
    #[serde(default)]
    pub exclude_packages: Vec<String>,

    /// Source root the excluded packages are resolved against
    #[serde(default)]
    pub src_path: Option<PathBuf>,

    /// Free-form per-run metadata
    #[serde(default)]
    pub metas: Metas,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            start_java_version: default_start_java_version(),
            target_java_version: default_target_java_version(),
            threads: default_threads(),
            charset: default_charset(),
            offset: default_offset(),
            file_mask: default_file_mask(),
            starting_paths: Vec::new(),
            exclude_paths: Vec::new(),
            exclude_packages: Vec::new(),
            src_path: None,
            metas: Metas::default(),
        }
    }
}

impl MigrateConfig {
    /// Configured starting paths, or `src` when none are given.
    pub fn starting_paths(&self) -> Vec<PathBuf> {
        if self.starting_paths.is_empty() {
            vec![PathBuf::from(DEFAULT_STARTING_PATH)]
        } else {
            self.starting_paths.clone()
        }
    }

    /// Lock primitive selected through the `migrateSynchronizedLocker` meta.
    pub fn locker_kind(&self) -> Result<LockerKind> {
        self.metas
            .get_value(&[LOCKER_META_KEY])
            .map_or(Ok(LockerKind::default()), |value| value.parse())
    }

    /// Resolved size of the worker pool.
    pub fn worker_count(&self) -> usize {
        resolve_worker_count(self.threads)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_utf8_label(&self.charset) {
            return Err(MigrationError::configuration(format!(
                "unsupported charset '{}', only UTF-8 is supported",
                self.charset
            )));
        }
        if self.file_mask.is_empty() {
            return Err(MigrationError::configuration("file_mask must not be empty"));
        }
        if self.target_java_version < self.start_java_version {
            return Err(MigrationError::configuration(format!(
                "target_java_version ({}) is lower than start_java_version ({})",
                self.target_java_version, self.start_java_version
            )));
        }
        if !self.exclude_packages.is_empty() && self.src_path.is_none() {
            return Err(MigrationError::configuration(
                "exclude_packages requires src_path",
            ));
        }
        for pattern in &self.exclude_paths {
            glob::Pattern::new(pattern)?;
        }
        self.locker_kind()?;
        Ok(())
    }
}

/// Worker pool size for a configured thread count, 0 = available parallelism.
pub fn resolve_worker_count(threads: usize) -> usize {
    match threads {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4),
        n => n,
    }
}

fn is_utf8_label(charset: &str) -> bool {
    matches!(
        charset.trim().to_ascii_lowercase().as_str(),
        "utf-8" | "utf8"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrateConfig::default();
        assert_eq!(config.offset, 4);
        assert_eq!(config.threads, 4);
        assert_eq!(config.file_mask, ".java");
        assert_eq!(config.starting_paths(), vec![PathBuf::from("src")]);
        assert_eq!(config.locker_kind().unwrap(), LockerKind::ReentrantReadWriteLock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_locker_from_metas() {
        let mut config = MigrateConfig::default();
        config.metas.push(LOCKER_META_KEY, "StampedLock");
        assert_eq!(config.locker_kind().unwrap(), LockerKind::StampedLock);
    }

    #[test]
    fn test_validate_rejects_unknown_locker() {
        let mut config = MigrateConfig::default();
        config.metas.push(LOCKER_META_KEY, "Mutex");
        assert!(matches!(
            config.validate(),
            Err(MigrationError::UnknownLocker(_))
        ));
    }

    #[test]
    fn test_validate_rejects_other_charsets() {
        let config = MigrateConfig {
            charset: "windows-1251".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = MigrateConfig {
            charset: "utf8".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_version_range() {
        let config = MigrateConfig {
            start_java_version: 21,
            target_java_version: 17,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_exclude_packages_need_src_path() {
        let config = MigrateConfig {
            exclude_packages: vec!["com.example.legacy".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_glob() {
        let config = MigrateConfig {
            exclude_paths: vec!["**/[".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MigrationError::Pattern(_))));
    }

    #[test]
    fn test_worker_count() {
        let config = MigrateConfig {
            threads: 0,
            ..Default::default()
        };
        assert!(config.worker_count() > 0);
        assert_eq!(MigrateConfig::default().worker_count(), 4);
    }

    #[test]
    fn test_resolve_worker_count() {
        assert_eq!(resolve_worker_count(3), 3);
        assert_eq!(
            resolve_worker_count(0),
            std::thread::available_parallelism().map_or(4, |n| n.get())
        );
    }
}
