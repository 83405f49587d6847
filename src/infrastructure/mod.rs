//! Infrastructure layer module
//!
//! This module contains the adapters that touch the outside world:
//! - Configuration management (figment, YAML + env)
//! - Logging infrastructure (tracing)
//! - Process execution (tokio child processes)
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod process;
