//! Slot desirability scoring.
//!
//! Pure additive model: given a task and a candidate timestamp,
//! produce a score from priority, predicted activity, window
//! membership, historical success, overdue-ness, and a time-of-day
//! resource heuristic. Deterministic for fixed inputs; the per-term
//! breakdown is kept so decisions can explain themselves.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::domain::models::{MaintenanceTask, MaintenanceWindow};
use crate::services::activity_model::{ActivityModel, OperationHistory};

const PRIORITY_WEIGHT: f64 = 10.0;
const ACTIVITY_DIVISOR: f64 = 10.0;
const WINDOW_BONUS: f64 = 20.0;
const SUCCESS_WEIGHT: f64 = 15.0;
const URGENCY_PER_HOUR: f64 = 2.0;
const URGENCY_CAP: f64 = 20.0;
const AVAILABILITY_WEIGHT: f64 = 5.0;

/// Score of one candidate slot with its per-term breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotScore {
    pub total: f64,
    pub priority_term: f64,
    pub activity_term: f64,
    pub window_term: f64,
    pub success_term: f64,
    pub urgency_term: f64,
    pub availability_term: f64,
    /// Activity level the candidate was scored against
    pub activity_level: f64,
}

impl SlotScore {
    /// Render the contributing factors as a justification string.
    pub fn reason(&self, task: &MaintenanceTask) -> String {
        let mut parts = vec![format!("priority {} (+{:.0})", task.priority, self.priority_term)];

        if task.constraints.requires_low_activity {
            parts.push(format!(
                "quiet slot, activity {:.0}% (+{:.1})",
                self.activity_level, self.activity_term
            ));
        } else {
            parts.push(format!(
                "activity {:.0}% (+{:.1})",
                self.activity_level, self.activity_term
            ));
        }

        if self.window_term > 0.0 {
            parts.push(format!("inside maintenance window (+{:.0})", self.window_term));
        }

        parts.push(format!("success history (+{:.1})", self.success_term));

        if self.urgency_term > 0.0 {
            parts.push(format!("overdue (+{:.1})", self.urgency_term));
        }

        parts.push(format!("resource availability (+{:.1})", self.availability_term));

        parts.join(", ")
    }
}

/// Scores candidate slots against the current activity estimates,
/// configured windows, and operation history.
#[derive(Debug, Clone, Copy)]
pub struct SlotScorer<'a> {
    activity: &'a ActivityModel,
    history: &'a OperationHistory,
    windows: &'a [MaintenanceWindow],
    now: DateTime<Utc>,
}

impl<'a> SlotScorer<'a> {
    pub fn new(
        activity: &'a ActivityModel,
        history: &'a OperationHistory,
        windows: &'a [MaintenanceWindow],
        now: DateTime<Utc>,
    ) -> Self {
        Self { activity, history, windows, now }
    }

    /// Score a candidate slot for a task. Never negative.
    pub fn score(&self, task: &MaintenanceTask, candidate: DateTime<Utc>) -> SlotScore {
        let hour = candidate.hour();
        let weekday = candidate.weekday().num_days_from_sunday();
        let activity_level = self.activity.activity_at(hour, weekday).average_activity;

        let priority_term = f64::from(task.priority) * PRIORITY_WEIGHT;

        // Quiet-hours tasks reward inverse activity; tasks that feed
        // on fresh commits reward activity directly.
        let activity_term = if task.constraints.requires_low_activity {
            (100.0 - activity_level) / ACTIVITY_DIVISOR
        } else {
            activity_level / ACTIVITY_DIVISOR
        };

        let window_term = if self.windows.iter().any(|w| w.contains(candidate)) {
            WINDOW_BONUS
        } else {
            0.0
        };

        let success_term =
            self.history.success_rate(&task.operation, hour, weekday) * SUCCESS_WEIGHT;

        let urgency_term = task.next_run.map_or(0.0, |next_run| {
            let overdue = self.now.signed_duration_since(next_run);
            if overdue > chrono::Duration::zero() {
                let hours = overdue.num_minutes() as f64 / 60.0;
                (hours * URGENCY_PER_HOUR).min(URGENCY_CAP)
            } else {
                0.0
            }
        });

        let availability_term = availability_factor(hour) * AVAILABILITY_WEIGHT;

        let total = (priority_term
            + activity_term
            + window_term
            + success_term
            + urgency_term
            + availability_term)
            .max(0.0);

        SlotScore {
            total,
            priority_term,
            activity_term,
            window_term,
            success_term,
            urgency_term,
            availability_term,
            activity_level,
        }
    }
}

/// Time-of-day resource availability: business hours are contended,
/// nights are free.
fn availability_factor(hour: u32) -> f64 {
    match hour {
        0..=5 => 1.0,
        6..=8 => 0.7,
        9..=17 => 0.2,
        18..=21 => 0.6,
        _ => 1.0,
    }
}
