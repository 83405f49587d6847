use std::collections::HashSet;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::{MaintenanceTask, MaintenanceWindow, Recurrence};
use crate::services::task_registry::cron_schedule;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid lookahead_hours: {0}. Must be between 1 and 168")]
    InvalidLookahead(u32),

    #[error("Invalid low_activity_threshold: {0}. Must be between 0 and 100")]
    InvalidActivityThreshold(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid cron expression '{expression}': {detail}")]
    InvalidCron { expression: String, detail: String },

    #[error("Duplicate task name: {0}")]
    DuplicateTaskName(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .custodian/config.yaml (project config)
    /// 3. .custodian/local.yaml (project local overrides, optional)
    /// 4. Environment variables (CUSTODIAN_* prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.custodian/) so one
    /// machine can watch over several repositories independently.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".custodian/config.yaml"))
            .merge(Yaml::file(".custodian/local.yaml"))
            .merge(Env::prefixed("CUSTODIAN_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.planner.lookahead_hours == 0 || config.planner.lookahead_hours > 168 {
            return Err(ConfigError::InvalidLookahead(config.planner.lookahead_hours));
        }

        if !(0.0..=100.0).contains(&config.planner.low_activity_threshold) {
            return Err(ConfigError::InvalidActivityThreshold(
                config.planner.low_activity_threshold,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        // Window and task specs must convert cleanly before anything
        // downstream sees them.
        for spec in &config.windows {
            MaintenanceWindow::try_from(spec).map_err(ConfigError::ValidationFailed)?;
        }

        let mut seen_names = HashSet::new();
        for spec in &config.tasks {
            if !seen_names.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateTaskName(spec.name.clone()));
            }

            MaintenanceTask::try_from(spec).map_err(ConfigError::ValidationFailed)?;

            if let Recurrence::Cron { expression } = &spec.recurrence {
                cron_schedule(expression).map_err(|err| ConfigError::InvalidCron {
                    expression: expression.clone(),
                    detail: err.to_string(),
                })?;
            }
        }

        Ok(())
    }
}
