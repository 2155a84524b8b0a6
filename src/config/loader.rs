use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::MigrateConfig;
use crate::core::{MigrationError, Result, ResultExt};

/// Name of the configuration file looked up in the directory hierarchy
pub const CONFIG_FILE_NAME: &str = ".syncmigrate.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse config from TOML string
pub fn parse_config(contents: &str) -> Result<MigrateConfig> {
    toml::from_str::<MigrateConfig>(contents).map_err(|e| {
        MigrationError::configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
    })
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<MigrateConfig> {
    let config = parse_config(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file the user named explicitly. Any failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<MigrateConfig> {
    let contents =
        read_config_file(path).map_err(|e| MigrationError::file_system(path, e))?;
    let config = parse_and_validate_config(&contents).context(path.display().to_string())?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading a discovered config from a specific path.
///
/// Unreadable or unparsable files are skipped with a warning. A file that
/// parses but fails validation is an error: its settings (exclusions, locker)
/// are clearly meant for this run.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Result<Option<MigrateConfig>> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return Ok(None);
        }
    };

    let config = match parse_config(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}: {}. Using defaults.", config_path.display(), e);
            return Ok(None);
        }
    };
    config
        .validate()
        .context(config_path.display().to_string())?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(Some(config))
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
pub fn discover_config(start: PathBuf) -> Result<MigrateConfig> {
    let found = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path).transpose())
        .transpose()?;

    Ok(found.unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        MigrateConfig::default()
    }))
}

/// Load the explicit config when given, otherwise discover one from the
/// current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<MigrateConfig> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(MigrateConfig::default())
        }
    }
}

/// Default configuration file written by `syncmigrate init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# syncmigrate configuration

# Migrations introduced after start and up to target are applied
start_java_version = 8
target_java_version = 21

# Worker threads (0 = available parallelism)
threads = 4

# Only UTF-8 is supported; any other charset is rejected
charset = "UTF-8"

# Spaces per indentation level in generated code
offset = 4

file_mask = ".java"
starting_paths = ["src"]
exclude_paths = []

# Packages under src_path to leave untouched
# src_path = "src/main/java"
# exclude_packages = ["com.example.generated"]

# Lock primitive: ReentrantReadWriteLock (default) or StampedLock
# [[metas]]
# migrateSynchronizedLocker = "StampedLock"
"#;
