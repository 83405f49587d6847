use std::io;

use anyhow::Result;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LoggingConfig;

/// Installed logging pipeline. Holds the file-writer guard so
/// buffered lines flush when the process exits.
pub struct Logger {
    _guard: Option<WorkerGuard>,
}

impl Logger {
    /// Install the global subscriber described by the configuration.
    ///
    /// Console output goes to stderr so command output on stdout
    /// stays machine-parseable. When a log directory is configured,
    /// a daily-rolling JSON file is written alongside.
    ///
    /// # Errors
    /// Returns an error if the configured level is not a known level.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let default_level = parse_log_level(&config.level)?;
        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();

        let json_console = config.format.eq_ignore_ascii_case("json");

        let guard = if let Some(ref directory) = config.directory {
            let file_appender = rolling::daily(directory, "custodian.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            // File output is always JSON for downstream tooling.
            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter.clone());

            if json_console {
                let console_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry()
                    .with(file_layer)
                    .with(console_layer)
                    .init();
            } else {
                let console_layer = tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(env_filter);
                tracing_subscriber::registry()
                    .with(file_layer)
                    .with(console_layer)
                    .init();
            }

            Some(guard)
        } else {
            if json_console {
                let console_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry().with(console_layer).init();
            } else {
                let console_layer = tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(env_filter);
                tracing_subscriber::registry().with(console_layer).init();
            }

            None
        };

        tracing::debug!(
            level = %config.level,
            format = %config.format,
            file_output = config.directory.is_some(),
            "logger initialized"
        );

        Ok(Self { _guard: guard })
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
