use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::task::{MaintenanceTask, Recurrence, TaskConstraints};
use super::window::MaintenanceWindow;

/// Main configuration structure for Custodian
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Planner tuning
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Maintenance window definitions
    #[serde(default)]
    pub windows: Vec<WindowSpec>,

    /// Declarative maintenance task definitions
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Planner tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// How far ahead to search for slots, in hours
    #[serde(default = "default_lookahead_hours")]
    pub lookahead_hours: u32,

    /// Activity level at or below which a slot counts as quiet (0-100)
    #[serde(default = "default_low_activity_threshold")]
    pub low_activity_threshold: f64,
}

const fn default_lookahead_hours() -> u32 {
    24
}

const fn default_low_activity_threshold() -> f64 {
    30.0
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lookahead_hours: default_lookahead_hours(),
            low_activity_threshold: default_low_activity_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for daily-rolling log files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            directory: None,
        }
    }
}

/// Maintenance window definition as written in the config file.
/// Times are "HH:MM" strings and days are short weekday names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WindowSpec {
    /// Window name
    pub name: String,

    /// Start time of day, "HH:MM"
    pub start: String,

    /// End time of day, "HH:MM" (at or before start wraps past midnight)
    pub end: String,

    /// Weekdays the window opens on
    pub days: Vec<String>,

    /// Preference weight when windows overlap
    #[serde(default)]
    pub priority: i32,
}

impl TryFrom<&WindowSpec> for MaintenanceWindow {
    type Error = String;

    fn try_from(spec: &WindowSpec) -> Result<Self, Self::Error> {
        if spec.name.trim().is_empty() {
            return Err("Window name cannot be empty".to_string());
        }
        if spec.days.is_empty() {
            return Err(format!("Window '{}' has no days", spec.name));
        }

        let start = parse_time(&spec.start)
            .ok_or_else(|| format!("Window '{}' has invalid start time: {}", spec.name, spec.start))?;
        let end = parse_time(&spec.end)
            .ok_or_else(|| format!("Window '{}' has invalid end time: {}", spec.name, spec.end))?;

        let days = spec
            .days
            .iter()
            .map(|d| {
                d.parse::<Weekday>()
                    .map_err(|_| format!("Window '{}' has invalid weekday: {}", spec.name, d))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MaintenanceWindow::new(spec.name.clone(), start, end, days)
            .with_priority(spec.priority))
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Maintenance task definition as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskSpec {
    /// Task name
    pub name: String,

    /// Operation tag; defaults to the task name
    #[serde(default)]
    pub operation: String,

    /// Scheduling priority
    #[serde(default = "default_task_priority")]
    pub priority: i32,

    /// Rough duration estimate in minutes
    #[serde(default = "default_task_duration")]
    pub estimated_duration_mins: u32,

    /// Recurrence cadence
    #[serde(default = "default_recurrence")]
    pub recurrence: Recurrence,

    /// Only place in quiet slots
    #[serde(default)]
    pub requires_low_activity: bool,

    /// Only place inside configured maintenance windows
    #[serde(default)]
    pub requires_maintenance_window: bool,

    /// Retries before a failed task stays failed
    #[serde(default = "default_task_max_retries")]
    pub max_retries: u32,

    /// Minimum minutes between consecutive runs
    #[serde(default)]
    pub cooldown_minutes: i64,
}

const fn default_task_priority() -> i32 {
    50
}

const fn default_task_duration() -> u32 {
    15
}

const fn default_recurrence() -> Recurrence {
    Recurrence::Adaptive
}

const fn default_task_max_retries() -> u32 {
    3
}

impl TryFrom<&TaskSpec> for MaintenanceTask {
    type Error = String;

    fn try_from(spec: &TaskSpec) -> Result<Self, Self::Error> {
        if spec.cooldown_minutes < 0 {
            return Err(format!(
                "Task '{}' has negative cooldown: {}",
                spec.name, spec.cooldown_minutes
            ));
        }

        let operation = if spec.operation.trim().is_empty() {
            spec.name.clone()
        } else {
            spec.operation.clone()
        };

        let task = MaintenanceTask::new(spec.name.clone(), operation)
            .with_priority(spec.priority)
            .with_duration(spec.estimated_duration_mins)
            .with_recurrence(spec.recurrence.clone())
            .with_constraints(TaskConstraints {
                requires_low_activity: spec.requires_low_activity,
                requires_maintenance_window: spec.requires_maintenance_window,
                max_retries: spec.max_retries,
                cooldown_minutes: spec.cooldown_minutes,
            });

        task.validate()?;
        Ok(task)
    }
}
