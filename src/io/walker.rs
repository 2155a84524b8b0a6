use crate::config::MigrateConfig;
use crate::core::{MigrationError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Collects the source files a run should migrate.
///
/// A file is selected when its name ends with the file mask, no exclusion
/// glob matches its path and its directory does not lie inside an excluded
/// package.
pub struct FileWalker {
    roots: Vec<PathBuf>,
    file_mask: String,
    exclude_patterns: Vec<glob::Pattern>,
    excluded_dirs: Vec<PathBuf>,
}

impl FileWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            file_mask: ".java".to_string(),
            exclude_patterns: vec![],
            excluded_dirs: vec![],
        }
    }

    /// Walker over the config's starting paths with all of its exclusions.
    pub fn from_config(config: &MigrateConfig) -> Result<Self> {
        let mut walker = Self::new(config.starting_paths())
            .with_file_mask(config.file_mask.clone())
            .with_exclude_patterns(&config.exclude_paths)?;
        if let Some(src_path) = &config.src_path {
            walker = walker.with_excluded_packages(src_path, &config.exclude_packages);
        }
        Ok(walker)
    }

    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    pub fn with_file_mask(mut self, mask: impl Into<String>) -> Self {
        self.file_mask = mask.into();
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    /// Exclude every file under `src_path/<package as path>` for each
    /// dot-separated package.
    pub fn with_excluded_packages(mut self, src_path: &Path, packages: &[String]) -> Self {
        self.excluded_dirs = packages
            .iter()
            .map(|package| src_path.join(package_to_path(package)))
            .collect();
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in &self.roots {
            if !root.exists() {
                warn!(root = %root.display(), "starting path does not exist, skipping");
                continue;
            }
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(true)
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| MigrationError::WithContext {
                    context: root.display().to_string(),
                    message: e.to_string(),
                })?;
                let path = entry.path();
                let is_file = entry.file_type().is_some_and(|t| t.is_file());

                if is_file && self.should_process(path) {
                    files.push(path.to_path_buf());
                }
            }
        }
        files.sort();
        files.dedup();
        debug!(count = files.len(), "discovered source files");
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let matches_mask = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.file_mask))
            .unwrap_or(false);
        if !matches_mask {
            return false;
        }

        let path_str = path.to_string_lossy();
        if self.exclude_patterns.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        match path.parent() {
            Some(parent) => !self.excluded_dirs.iter().any(|dir| parent.starts_with(dir)),
            None => true,
        }
    }
}

fn package_to_path(package: &str) -> PathBuf {
    package.split('.').filter(|s| !s.is_empty()).collect()
}

/// Files selected by `config`.
pub fn find_source_files(config: &MigrateConfig) -> Result<Vec<PathBuf>> {
    FileWalker::from_config(config)?.walk()
}
