use crate::config::parse_meta_arg;
use crate::synchronized::LockerKind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "syncmigrate")]
#[command(
    about = "Rewrite synchronized Java methods into explicit locks",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate every matching source file in place
    ///
    /// Source files are read and written as UTF-8. A `charset` other than
    /// UTF-8 in the configuration is rejected.
    Migrate {
        /// Directories to walk (overrides starting_paths)
        paths: Vec<PathBuf>,

        /// Configuration file (default: nearest .syncmigrate.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Worker threads (0 = available parallelism)
        #[arg(long, short = 'j', env = "SYNCMIGRATE_THREADS")]
        threads: Option<usize>,

        /// Spaces per indentation level in generated code
        #[arg(long)]
        indent: Option<usize>,

        /// Lock primitive to generate
        #[arg(long, value_parser = parse_locker)]
        locker: Option<LockerKind>,

        /// Java version the code currently targets
        #[arg(long)]
        start_version: Option<u32>,

        /// Java version to migrate to
        #[arg(long)]
        target_version: Option<u32>,

        /// Glob of files to leave alone (repeatable)
        #[arg(long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,

        /// Extra metadata entry (repeatable)
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta_arg)]
        metas: Vec<(String, String)>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Suppress the progress bar and summary
        #[arg(long, short = 'q')]
        quiet: bool,

        /// Increase log verbosity (-v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
        verbosity: u8,
    },

    /// List every synchronized occurrence and how it would be treated
    Scan {
        /// Files or directories to scan (default: configured starting paths)
        paths: Vec<PathBuf>,

        /// Configuration file (default: nearest .syncmigrate.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Emit JSON instead of one line per occurrence
        #[arg(long)]
        json: bool,

        #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .syncmigrate.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_locker(value: &str) -> Result<LockerKind, String> {
    value.parse().map_err(|e: crate::core::MigrationError| e.to_string())
}
