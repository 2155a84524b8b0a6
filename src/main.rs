use anyhow::Result;
use clap::Parser;
use syncmigrate::cli::{Cli, Commands};
use syncmigrate::commands::{self, MigrateArgs, ScanArgs};
use syncmigrate::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            paths,
            config,
            threads,
            indent,
            locker,
            start_version,
            target_version,
            exclude,
            metas,
            dry_run,
            quiet,
            verbosity,
        } => {
            init_tracing(verbosity);
            commands::handle_migrate(MigrateArgs {
                paths,
                config,
                threads,
                indent,
                locker,
                start_version,
                target_version,
                exclude,
                metas,
                dry_run,
                quiet,
                verbosity,
            })?;
        }
        Commands::Scan {
            paths,
            config,
            json,
            verbosity,
        } => {
            init_tracing(verbosity);
            commands::handle_scan(ScanArgs {
                paths,
                config,
                json,
            })?;
        }
        Commands::Init { force } => {
            init_tracing(0);
            commands::init_config(force)?;
        }
    }
    Ok(())
}
