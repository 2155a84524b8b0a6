//! Subscriber installation for the binary.

use once_cell::sync::OnceCell;
use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, EnvFilter};

static TRACING_GUARD: OnceCell<()> = OnceCell::new();

/// Filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global `fmt` subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the verbosity flag. Records emitted through the `log`
/// facade land in the same subscriber. Repeated calls are no-ops.
pub fn init_tracing(verbosity: u8) {
    TRACING_GUARD.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        let installed = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .compact()
            .try_init();

        if let Err(err) = installed {
            eprintln!("warning: tracing subscriber not installed: {err}");
        }
    });
}
