//! CLI command implementations.
//!
//! - **migrate**: rewrite synchronized methods in place
//! - **scan**: list occurrences without touching files
//! - **init**: write a default `.syncmigrate.toml`

pub mod init;
pub mod migrate;
pub mod scan;

pub use init::init_config;
pub use migrate::{handle_migrate, MigrateArgs};
pub use scan::{handle_scan, scan_source, ScanArgs, ScanEntry};
