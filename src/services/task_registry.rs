//! Maintenance task registry.
//!
//! Single owner of the task collection and its lifecycle: validated
//! registration, status transitions, retry re-queueing, and next-run
//! recomputation after each completed run. Callers hold the registry
//! by value or behind one lock; it does no internal locking.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use cron::Schedule;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{MaintenanceTask, Recurrence, TaskStatus};

/// Parse a cron expression, accepting the common 5-field form.
///
/// The evaluator wants a seconds field, so `min hour dom month dow`
/// is normalized by prepending `0`.
pub fn cron_schedule(expression: &str) -> DomainResult<Schedule> {
    let normalized = if expression.split_whitespace().count() == 5 {
        format!("0 {expression}")
    } else {
        expression.to_string()
    };
    Schedule::from_str(&normalized)
        .map_err(|e| DomainError::InvalidRecurrence(format!("{expression}: {e}")))
}

/// In-memory registry of maintenance tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<MaintenanceTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Register a task. Rejects duplicate ids and names, invalid task
    /// shapes, and unparseable cron expressions. Cron tasks with no
    /// explicit `next_run` get their next occurrence computed here.
    pub fn add(&mut self, mut task: MaintenanceTask) -> DomainResult<Uuid> {
        task.validate().map_err(DomainError::ValidationFailed)?;

        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(DomainError::DuplicateTask(task.id));
        }
        if self.tasks.iter().any(|t| t.name == task.name) {
            return Err(DomainError::ValidationFailed(format!(
                "Task name '{}' already registered",
                task.name
            )));
        }

        if let Recurrence::Cron { expression } = &task.recurrence {
            let schedule = cron_schedule(expression)?;
            if task.next_run.is_none() {
                task.next_run = schedule.after(&Utc::now()).next();
            }
        }

        let id = task.id;
        info!(task = %task.name, recurrence = task.recurrence.as_str(), "Registered maintenance task");
        self.tasks.push(task);
        Ok(id)
    }

    pub fn get(&self, id: Uuid) -> Option<&MaintenanceTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&MaintenanceTask> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// All registered tasks in registration order.
    pub fn all(&self) -> &[MaintenanceTask] {
        &self.tasks
    }

    /// Tasks the planner may place: pending and not exhausted.
    pub fn schedulable(&self) -> Vec<&MaintenanceTask> {
        self.tasks
            .iter()
            .filter(|t| t.status.is_schedulable() && !t.is_exhausted())
            .collect()
    }

    /// Apply a status transition with lifecycle bookkeeping.
    ///
    /// On `Completed`, `last_run` is stamped, `retry_count` resets,
    /// `next_run` is recomputed from the recurrence, and recurring
    /// tasks re-queue to `Pending` (one-shot tasks stay parked in
    /// `Completed`). On `Failed`, the task re-queues to `Pending`
    /// while retries remain, otherwise it stays `Failed`.
    pub fn set_status(&mut self, id: Uuid, new_status: TaskStatus) -> DomainResult<()> {
        let now = Utc::now();
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::TaskNotFound(id))?;

        if !task.status.can_transition_to(new_status) {
            return Err(DomainError::InvalidTransition {
                from: task.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }

        task.status = new_status;
        task.updated_at = now;

        match new_status {
            TaskStatus::Completed => {
                task.last_run = Some(now);
                task.retry_count = 0;
                task.next_run = next_run_after(&task.recurrence, now)?;
                if task.recurrence != Recurrence::Once {
                    task.status = TaskStatus::Pending;
                }
                info!(task = %task.name, next_run = ?task.next_run, "Task run completed");
            }
            TaskStatus::Failed => {
                task.retry_count += 1;
                if task.retry_count < task.constraints.max_retries {
                    task.status = TaskStatus::Pending;
                    warn!(
                        task = %task.name,
                        retry = task.retry_count,
                        max = task.constraints.max_retries,
                        "Task run failed, re-queued"
                    );
                } else {
                    warn!(task = %task.name, "Task run failed, retries exhausted");
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Next due time after a completed run.
fn next_run_after(recurrence: &Recurrence, now: DateTime<Utc>) -> DomainResult<Option<DateTime<Utc>>> {
    match recurrence {
        Recurrence::Interval { minutes } => Ok(Some(now + Duration::minutes(*minutes))),
        Recurrence::Cron { expression } => Ok(cron_schedule(expression)?.after(&now).next()),
        // Adaptive tasks are due whenever the planner finds a good
        // slot; one-shot tasks are done.
        Recurrence::Adaptive | Recurrence::Once => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn registry_with(task: MaintenanceTask) -> (TaskRegistry, Uuid) {
        let mut registry = TaskRegistry::new();
        let id = registry.add(task).unwrap();
        (registry, id)
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let task = MaintenanceTask::new("scan", "security-scan");
        let copy = task.clone();
        let (mut registry, _) = registry_with(task);

        let result = registry.add(copy);
        assert!(matches!(result, Err(DomainError::DuplicateTask(_))));
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let (mut registry, _) = registry_with(MaintenanceTask::new("scan", "security-scan"));
        let result = registry.add(MaintenanceTask::new("scan", "other-op"));
        assert!(matches!(result, Err(DomainError::ValidationFailed(_))));
    }

    #[test]
    fn test_add_rejects_bad_cron() {
        let mut registry = TaskRegistry::new();
        let task = MaintenanceTask::new("scan", "scan")
            .with_recurrence(Recurrence::Cron { expression: "not a cron".to_string() });
        assert!(matches!(registry.add(task), Err(DomainError::InvalidRecurrence(_))));
    }

    #[test]
    fn test_add_computes_cron_next_run() {
        let mut registry = TaskRegistry::new();
        let task = MaintenanceTask::new("nightly", "security-scan")
            .with_recurrence(Recurrence::Cron { expression: "0 3 * * *".to_string() });
        let id = registry.add(task).unwrap();

        let next = registry.get(id).unwrap().next_run.expect("cron task gets next_run");
        assert_eq!(next.hour(), 3);
        assert_eq!(next.minute(), 0);
        assert!(next > Utc::now());
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let (mut registry, id) = registry_with(MaintenanceTask::new("scan", "scan"));
        let result = registry.set_status(id, TaskStatus::Completed);
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        let mut registry = TaskRegistry::new();
        let result = registry.set_status(Uuid::new_v4(), TaskStatus::Running);
        assert!(matches!(result, Err(DomainError::TaskNotFound(_))));
    }

    #[test]
    fn test_completion_requeues_interval_task() {
        let task = MaintenanceTask::new("deps", "dependency-update")
            .with_recurrence(Recurrence::Interval { minutes: 60 });
        let (mut registry, id) = registry_with(task);

        registry.set_status(id, TaskStatus::Running).unwrap();
        registry.set_status(id, TaskStatus::Completed).unwrap();

        let task = registry.get(id).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.last_run.is_some());

        let next = task.next_run.expect("interval task gets next_run");
        let minutes_out = (next - Utc::now()).num_minutes();
        assert!((55..=60).contains(&minutes_out), "next_run ~60min out, got {minutes_out}");
    }

    #[test]
    fn test_completion_parks_one_shot_task() {
        let task = MaintenanceTask::new("audit", "security-scan").with_recurrence(Recurrence::Once);
        let (mut registry, id) = registry_with(task);

        registry.set_status(id, TaskStatus::Running).unwrap();
        registry.set_status(id, TaskStatus::Completed).unwrap();

        let task = registry.get(id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.next_run.is_none());
        assert!(registry.schedulable().is_empty());
    }

    #[test]
    fn test_failure_requeues_until_retries_exhausted() {
        let task = MaintenanceTask::new("deps", "dependency-update");
        let (mut registry, id) = registry_with(task);

        // Default max_retries is 3: two failures re-queue, the third parks.
        for expected_retry in 1..=2 {
            registry.set_status(id, TaskStatus::Running).unwrap();
            registry.set_status(id, TaskStatus::Failed).unwrap();
            let task = registry.get(id).unwrap();
            assert_eq!(task.status, TaskStatus::Pending);
            assert_eq!(task.retry_count, expected_retry);
        }

        registry.set_status(id, TaskStatus::Running).unwrap();
        registry.set_status(id, TaskStatus::Failed).unwrap();
        assert_eq!(registry.get(id).unwrap().status, TaskStatus::Failed);
        assert!(registry.schedulable().is_empty());
    }

    #[test]
    fn test_success_resets_retry_count() {
        let task = MaintenanceTask::new("deps", "dependency-update");
        let (mut registry, id) = registry_with(task);

        registry.set_status(id, TaskStatus::Running).unwrap();
        registry.set_status(id, TaskStatus::Failed).unwrap();
        assert_eq!(registry.get(id).unwrap().retry_count, 1);

        registry.set_status(id, TaskStatus::Running).unwrap();
        registry.set_status(id, TaskStatus::Completed).unwrap();
        assert_eq!(registry.get(id).unwrap().retry_count, 0);
    }

    #[test]
    fn test_cron_normalization_accepts_five_fields() {
        assert!(cron_schedule("0 3 * * *").is_ok());
        assert!(cron_schedule("0 0 3 * * *").is_ok());
        assert!(cron_schedule("*/5 * * * *").is_ok());
        assert!(cron_schedule("totally wrong").is_err());
    }

    #[test]
    fn test_running_task_is_not_schedulable() {
        let (mut registry, id) = registry_with(MaintenanceTask::new("scan", "scan"));
        assert_eq!(registry.schedulable().len(), 1);

        registry.set_status(id, TaskStatus::Running).unwrap();
        assert!(registry.schedulable().is_empty());
    }
}
