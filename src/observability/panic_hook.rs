//! Panic hook that prints what the migration was doing when it crashed.

use super::context::{get_current_context, get_progress, MigrationContextSnapshot};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str =
    "════════════════════════════════════════════════════════════════════════════════";

/// Install the crash report hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (processed, total) = get_progress();

    eprintln!();
    eprintln!("{RULE}");
    eprintln!("  SYNCMIGRATE CRASH REPORT (version {VERSION}, {})", std::env::consts::OS);
    eprintln!("{RULE}");
    eprintln!("  PANIC: {}", truncate(&extract_panic_message(info), 68));
    if let Some(location) = info.location() {
        eprintln!(
            "  Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }
    for line in context_lines(&context, processed, total) {
        eprintln!("  {line}");
    }
    if let Some(metadata) = Span::current().metadata() {
        eprintln!("  Span: {}", metadata.name());
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!("{RULE}");
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("  Run with RUST_BACKTRACE=1 for stack trace");
    }
    eprintln!("{RULE}");
    if let Some(file) = &context.current_file {
        eprintln!("The file being migrated was left untouched: {}", file.display());
    }
}

fn context_lines(context: &MigrationContextSnapshot, processed: usize, total: usize) -> Vec<String> {
    let mut lines = vec![match &context.phase {
        Some(phase) => format!("Phase: {phase}"),
        None => "Phase: (not set - crash occurred before migration started)".to_string(),
    }];
    if let Some(file) = &context.current_file {
        lines.push(format!("File: {}", file.display()));
    }
    if total > 0 {
        let pct = (processed as f64 / total as f64 * 100.0) as usize;
        lines.push(format!("Progress: {processed} / {total} files ({pct}%)"));
    }
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
