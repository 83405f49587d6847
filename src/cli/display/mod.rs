//! Display framework for CLI output formatting.
//!
//! Shared primitives for colors and tables used across all command
//! output, plus the human/JSON output dispatch.

pub mod colors;
pub mod table;

use serde::Serialize;

pub use colors::*;
pub use table::*;

/// Trait for types that can be rendered as human-readable or JSON output.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Dispatch output based on JSON mode flag.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

/// Render a success action result.
pub fn action_success(message: &str) -> String {
    use colored::Colorize;
    format!("{} {}", "\u{2713}".green().bold(), message)
}

/// Render a failure action result.
pub fn action_failure(message: &str) -> String {
    use colored::Colorize;
    format!("{} {}", "\u{2717}".red().bold(), message)
}

/// Truncate a string to a maximum length, appending "..." if truncated.
/// The cut always lands on a char boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= keep)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 10), "a longe...");

        // A multi-byte char straddling the cut point must not split.
        let accented = format!("{}éééé", "x".repeat(56));
        assert_eq!(truncate(&accented, 60), format!("{}...", "x".repeat(56)));
        assert_eq!(truncate(&"é".repeat(10), 9), "ééé...");
    }
}
