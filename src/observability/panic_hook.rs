//! Custom panic hook for structured crash reports.
//!
//! A crash report names the build phase, the unit and file in progress and
//! how many units had been processed, followed by the panic message and
//! location.

use super::context::{get_current_context, get_progress, BuildContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str =
    "════════════════════════════════════════════════════════════════════════════════";

/// Install the custom panic hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report(info));
    }));
}

fn crash_report(info: &PanicHookInfo<'_>) -> String {
    let context = get_current_context();
    let (processed, total) = get_progress();

    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        "COVSUITE CRASH REPORT".to_string(),
        format!("  Version: {VERSION}"),
        format!("  Platform: {}", std::env::consts::OS),
        format!(
            "  Time: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ),
        RULE.to_string(),
        format!("  PANIC: {}", truncate(&extract_panic_message(info), 68)),
    ];

    if let Some(location) = info.location() {
        lines.push(format!(
            "  Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }

    lines.extend(context_lines(&context, processed, total));

    if let Some(metadata) = Span::current().metadata() {
        lines.push(format!("    Span: {}", truncate(metadata.name(), 67)));
    }

    lines.push(RULE.to_string());
    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(std::backtrace::Backtrace::capture().to_string());
    } else {
        lines.push("  Run with RUST_BACKTRACE=1 for stack trace".to_string());
    }

    lines.join("\n")
}

fn context_lines(context: &BuildContext, processed: usize, total: usize) -> Vec<String> {
    let mut lines = vec!["  OPERATION CONTEXT:".to_string()];

    match &context.phase {
        Some(phase) => lines.push(format!("    Phase: {phase}")),
        None => lines.push("    Phase: (not set - crash occurred before the build started)".into()),
    }
    if let Some(unit) = &context.current_unit {
        lines.push(format!("    Unit: {}", truncate(unit, 67)));
    }
    if let Some(file) = &context.current_file {
        lines.push(format!(
            "    File: {}",
            truncate(&file.display().to_string(), 67)
        ));
    }
    if total > 0 {
        let pct = (processed as f64 / total as f64 * 100.0) as usize;
        lines.push(format!("    Progress: {processed} / {total} units ({pct}%)"));
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
