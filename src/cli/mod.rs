//! CLI layer: argument parsing, command execution, and display.

pub mod commands;
pub mod display;
pub mod types;

pub use types::{Cli, Commands};

/// Print a command error in the requested format and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{}", display::action_failure(&format!("{err:#}")));
    }
    std::process::exit(1);
}
