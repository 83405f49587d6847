//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON console output on stderr
//! - Optional daily-rolling JSON log file

pub mod logger;

pub use logger::Logger;
