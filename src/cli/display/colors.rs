//! Status, confidence, and strategy color mapping for CLI output.
//!
//! All coloring respects `NO_COLOR` env var automatically via the `colored` crate.

use colored::Colorize;

/// Returns a colored string for a task status value.
///
/// Color scheme:
/// - Green:  completed
/// - Yellow: running
/// - Blue:   pending
/// - Red:    failed
/// - Dim:    skipped
pub fn colorize_status(status: &str) -> colored::ColoredString {
    match status.to_lowercase().as_str() {
        "complete" | "completed" => status.green().bold(),
        "running" => status.yellow(),
        "pending" => status.blue(),
        "failed" => status.red().bold(),
        "skipped" => status.dimmed(),
        _ => status.white(),
    }
}

/// Returns a colored string for a confidence band.
pub fn colorize_confidence(band: &str) -> colored::ColoredString {
    match band.to_lowercase().as_str() {
        "high" => band.green(),
        "medium" => band.yellow(),
        "low" => band.red(),
        _ => band.white(),
    }
}

/// Returns a colored string for a resolution strategy.
///
/// Automatic strategies render cyan; escalation stands out red.
pub fn colorize_strategy(strategy: &str) -> colored::ColoredString {
    match strategy.to_lowercase().as_str() {
        "escalate" => strategy.red().bold(),
        "structured_merge" => strategy.cyan().bold(),
        "prefer_local" | "prefer_remote" => strategy.cyan(),
        _ => strategy.white(),
    }
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", name.bold(), ":".dimmed())
}

/// Section header with underline.
pub fn section_header(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}
