//! Panic hook printing a crash report with the audit context.
//!
//! The report names the stage that was running, the snapshot being audited
//! and how many pipeline stages had completed.

use super::context::{get_current_context, AuditContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the crash-report panic hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();

    eprintln!();
    for line in crash_report_lines(&context, &extract_panic_message(info), location(info)) {
        eprintln!("{}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn location(info: &PanicHookInfo<'_>) -> Option<String> {
    info.location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
}

fn boxed(text: &str) -> String {
    format!("║  {:<width$} ║", truncate(text, WIDTH - 3), width = WIDTH - 3)
}

fn rule(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(WIDTH), right)
}

fn crash_report_lines(
    context: &AuditContext,
    message: &str,
    location: Option<String>,
) -> Vec<String> {
    let mut lines = vec![
        rule('╔', '╗'),
        boxed("RECORD AUDIT CRASH REPORT"),
        rule('╠', '╣'),
        boxed(&format!("Version: {}", VERSION)),
        boxed(&format!("Platform: {}", std::env::consts::OS)),
        boxed(&format!("Time: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))),
        rule('╠', '╣'),
        boxed(&format!("PANIC: {}", message)),
    ];
    if let Some(location) = location {
        lines.push(boxed(&format!("Location: {}", location)));
    }

    lines.push(rule('╠', '╣'));
    lines.push(boxed("AUDIT CONTEXT:"));
    match &context.phase {
        Some(phase) => lines.push(boxed(&format!("  Stage: {}", phase))),
        None => lines.push(boxed("  Stage: (not set - crash occurred before the audit started)")),
    }
    if let Some(metadata) = Span::current().metadata() {
        lines.push(boxed(&format!("  Span: {}", metadata.name())));
    }
    if let Some(snapshot) = &context.snapshot {
        lines.push(boxed(&format!("  Snapshot: {}", snapshot)));
    }
    if let Some(progress) = &context.progress {
        lines.push(boxed(&format!(
            "  Progress: {} / {} stages ({}%)",
            progress.completed,
            progress.total,
            progress.percent()
        )));
    }

    lines.push(rule('╠', '╣'));
    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(boxed("STACK TRACE:"));
    } else {
        lines.push(boxed("Run with RUST_BACKTRACE=1 for stack trace"));
    }
    lines.push(rule('╚', '╝'));
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
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::{AuditPhase, StageProgress};

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("this is a long string that needs truncation", 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "...");
    }

    #[test]
    fn test_report_names_stage_and_snapshot() {
        let context = AuditContext {
            phase: Some(AuditPhase::RegionalRecords),
            snapshot: Some("archive.json".into()),
            progress: Some(StageProgress { completed: 5, total: 10 }),
        };
        let lines = crash_report_lines(&context, "boom", Some("src/lib.rs:1:1".into()));
        let report = lines.join("\n");
        assert!(report.contains("Stage: regional_records"));
        assert!(report.contains("Snapshot: archive.json"));
        assert!(report.contains("5 / 10 stages (50%)"));
        assert!(report.contains("PANIC: boom"));
    }

    #[test]
    fn test_report_lines_have_equal_width() {
        let lines = crash_report_lines(&AuditContext::new(), "boom", None);
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == WIDTH + 2));
    }
}
