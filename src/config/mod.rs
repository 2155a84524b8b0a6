//! Run configuration: the `.syncmigrate.toml` file, its defaults and the
//! per-run metadata list.

mod core;
mod loader;
pub mod meta;

// Re-export core types
pub use self::core::{resolve_worker_count, MigrateConfig, DEFAULT_STARTING_PATH};

// Re-export loader functions
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    parse_and_validate_config, parse_config, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE,
};

pub use meta::{parse_meta_arg, Meta, Metas};
