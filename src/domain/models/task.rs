//! Maintenance task domain model.
//!
//! A task describes one recurring maintenance operation (dependency
//! updates, branch cleanup, security scans) together with the
//! constraints the planner must honor when placing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a maintenance task in its run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is waiting to be scheduled
    Pending,
    /// Task is currently executing
    Running,
    /// Last run finished successfully
    Completed,
    /// Last run failed
    Failed,
    /// Task was deliberately passed over this cycle
    Skipped,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "complete" | "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Whether the planner may consider this task for placement.
    /// Running tasks are never candidates.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> Vec<TaskStatus> {
        match self {
            Self::Pending => vec![Self::Running, Self::Skipped],
            Self::Running => vec![Self::Completed, Self::Failed],
            // Recurring tasks re-queue after a run; the registry keeps
            // one-shot tasks parked in Completed.
            Self::Completed => vec![Self::Pending],
            Self::Failed => vec![Self::Pending],
            Self::Skipped => vec![Self::Pending],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

/// How a task recurs after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Run once, then stay completed.
    Once,
    /// Run at a fixed interval.
    Interval { minutes: i64 },
    /// Run on a cron schedule (5-field: min hour dom month dow).
    Cron { expression: String },
    /// No fixed cadence; the planner picks the best slot each cycle.
    Adaptive,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Interval { .. } => "interval",
            Self::Cron { .. } => "cron",
            Self::Adaptive => "adaptive",
        }
    }

    /// Human-readable description of the cadence.
    pub fn description(&self) -> String {
        match self {
            Self::Once => "once".to_string(),
            Self::Interval { minutes } => {
                if *minutes >= 1440 && minutes % 1440 == 0 {
                    format!("every {} day(s)", minutes / 1440)
                } else if *minutes >= 60 && minutes % 60 == 0 {
                    format!("every {} hour(s)", minutes / 60)
                } else {
                    format!("every {} minute(s)", minutes)
                }
            }
            Self::Cron { expression } => format!("cron: {}", expression),
            Self::Adaptive => "adaptive".to_string(),
        }
    }
}

/// Placement constraints the planner must honor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConstraints {
    /// Only place this task in slots with low predicted activity.
    pub requires_low_activity: bool,
    /// Only place this task inside a configured maintenance window.
    pub requires_maintenance_window: bool,
    /// How many times a failed run is re-queued before giving up.
    pub max_retries: u32,
    /// Minimum minutes between consecutive runs.
    pub cooldown_minutes: i64,
}

impl Default for TaskConstraints {
    fn default() -> Self {
        Self {
            requires_low_activity: false,
            requires_maintenance_window: false,
            max_retries: 3,
            cooldown_minutes: 0,
        }
    }
}

/// A recurring maintenance operation with scheduling constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    /// Unique identifier
    pub id: Uuid,
    /// Human-readable name (unique within a registry)
    pub name: String,
    /// Operation tag handed to the external executor
    pub operation: String,
    /// Scheduling priority (higher wins contested slots)
    pub priority: i32,
    /// Rough duration estimate, informational only
    pub estimated_duration_mins: u32,
    /// Tasks that should run before this one, informational only
    pub depends_on: Vec<Uuid>,
    /// Placement constraints
    pub constraints: TaskConstraints,
    /// Recurrence cadence
    pub recurrence: Recurrence,
    /// Next due time, recomputed by the registry after each run
    pub next_run: Option<DateTime<Utc>>,
    /// When the task last ran to completion
    pub last_run: Option<DateTime<Utc>>,
    /// Current lifecycle status
    pub status: TaskStatus,
    /// Consecutive failed runs since the last success
    pub retry_count: u32,
    /// When created
    pub created_at: DateTime<Utc>,
    /// When last updated
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTask {
    /// Create a new adaptive task with default constraints.
    pub fn new(name: impl Into<String>, operation: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            operation: operation.into(),
            priority: 50,
            estimated_duration_mins: 15,
            depends_on: Vec::new(),
            constraints: TaskConstraints::default(),
            recurrence: Recurrence::Adaptive,
            next_run: None,
            last_run: None,
            status: TaskStatus::default(),
            retry_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the recurrence cadence.
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Set placement constraints.
    pub fn with_constraints(mut self, constraints: TaskConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the duration estimate.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration_mins = minutes;
        self
    }

    /// Add a dependency.
    pub fn with_dependency(mut self, task_id: Uuid) -> Self {
        if !self.depends_on.contains(&task_id) && task_id != self.id {
            self.depends_on.push(task_id);
        }
        self
    }

    /// Set the next due time.
    pub fn with_next_run(mut self, at: DateTime<Utc>) -> Self {
        self.next_run = Some(at);
        self
    }

    /// Require low repository activity for placement.
    pub fn requiring_low_activity(mut self) -> Self {
        self.constraints.requires_low_activity = true;
        self
    }

    /// Require a maintenance window for placement.
    pub fn requiring_window(mut self) -> Self {
        self.constraints.requires_maintenance_window = true;
        self
    }

    /// Check if can transition to given status.
    pub fn can_transition_to(&self, new_status: TaskStatus) -> bool {
        self.status.can_transition_to(new_status)
    }

    /// Whether this is a one-shot task that already completed.
    pub fn is_exhausted(&self) -> bool {
        self.recurrence == Recurrence::Once && self.status == TaskStatus::Completed
    }

    /// Whether a failed run may be re-queued.
    pub fn can_retry(&self) -> bool {
        self.status == TaskStatus::Failed && self.retry_count < self.constraints.max_retries
    }

    /// Validate task shape. Cron expressions are checked at the
    /// registry boundary where the evaluator lives.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Task name cannot be empty".to_string());
        }
        if self.operation.trim().is_empty() {
            return Err("Task operation cannot be empty".to_string());
        }
        if let Recurrence::Interval { minutes } = self.recurrence {
            if minutes <= 0 {
                return Err(format!("Interval must be positive, got {} minutes", minutes));
            }
        }
        if self.depends_on.contains(&self.id) {
            return Err("Task cannot depend on itself".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = MaintenanceTask::new("dependency-update", "dependency-update");
        assert_eq!(task.name, "dependency-update");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.recurrence, Recurrence::Adaptive);
        assert!(task.next_run.is_none());
    }

    #[test]
    fn test_status_transitions() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Running));
        assert!(TaskStatus::Running.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::Running.can_transition_to(TaskStatus::Failed));
        assert!(TaskStatus::Failed.can_transition_to(TaskStatus::Pending));
        assert!(TaskStatus::Completed.can_transition_to(TaskStatus::Pending));

        // A run cannot be skipped mid-flight or complete without running.
        assert!(!TaskStatus::Running.can_transition_to(TaskStatus::Skipped));
        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn test_only_pending_is_schedulable() {
        assert!(TaskStatus::Pending.is_schedulable());
        assert!(!TaskStatus::Running.is_schedulable());
        assert!(!TaskStatus::Completed.is_schedulable());
        assert!(!TaskStatus::Failed.is_schedulable());
    }

    #[test]
    fn test_retry_gate() {
        let mut task = MaintenanceTask::new("branch-cleanup", "branch-cleanup");
        task.status = TaskStatus::Failed;
        task.retry_count = 2;
        assert!(task.can_retry());

        task.retry_count = 3;
        assert!(!task.can_retry());
    }

    #[test]
    fn test_one_shot_exhaustion() {
        let mut task =
            MaintenanceTask::new("initial-audit", "security-scan").with_recurrence(Recurrence::Once);
        assert!(!task.is_exhausted());
        task.status = TaskStatus::Completed;
        assert!(task.is_exhausted());
    }

    #[test]
    fn test_recurrence_description() {
        assert_eq!(Recurrence::Once.description(), "once");
        assert_eq!(Recurrence::Interval { minutes: 90 }.description(), "every 90 minute(s)");
        assert_eq!(Recurrence::Interval { minutes: 120 }.description(), "every 2 hour(s)");
        assert_eq!(Recurrence::Interval { minutes: 2880 }.description(), "every 2 day(s)");
        assert_eq!(
            Recurrence::Cron { expression: "0 3 * * *".to_string() }.description(),
            "cron: 0 3 * * *"
        );
    }

    #[test]
    fn test_dependency_list_stays_deduplicated() {
        let prerequisite = MaintenanceTask::new("lockfile-refresh", "dependency-update");
        let task = MaintenanceTask::new("security-audit", "security-scan")
            .with_dependency(prerequisite.id)
            .with_dependency(prerequisite.id);
        assert_eq!(task.depends_on, vec![prerequisite.id]);

        // Self-dependencies are refused at the builder, so the task
        // stays valid.
        let own_id = task.id;
        let task = task.with_dependency(own_id);
        assert!(!task.depends_on.contains(&own_id));
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let task = MaintenanceTask::new("", "scan");
        assert!(task.validate().is_err());

        let task = MaintenanceTask::new("scan", "   ");
        assert!(task.validate().is_err());

        let task = MaintenanceTask::new("scan", "scan")
            .with_recurrence(Recurrence::Interval { minutes: 0 });
        assert!(task.validate().is_err());

        let task = MaintenanceTask::new("scan", "scan");
        assert!(task.validate().is_ok());
    }
}
