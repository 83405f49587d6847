//! Scheduling decision output model.
//!
//! Decisions are what the planner hands back to the orchestrator: one
//! placement per task with the winning slot, the reasoning behind it,
//! and runner-up slots kept for conflict-driven rescheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A runner-up slot retained alongside the chosen one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAlternative {
    pub time: DateTime<Utc>,
    pub score: f64,
    pub reason: String,
}

/// The planner's placement for one maintenance task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingDecision {
    /// Task this decision places
    pub task_id: Uuid,
    /// Task name, denormalized for display
    pub task_name: String,
    /// Operation tag, denormalized for display
    pub operation: String,
    /// Chosen start time
    pub scheduled_time: DateTime<Utc>,
    /// Score of the chosen slot
    pub score: f64,
    /// Human-readable justification built from the scoring factors
    pub reason: String,
    /// Margin between best and runner-up slot, 0.0-1.0
    pub confidence: f64,
    /// Up to three runner-up slots for rescheduling
    pub alternatives: Vec<ScheduleAlternative>,
    /// True when no slot satisfied the task's constraints and the
    /// placement is a boundary fallback
    pub fallback: bool,
}

impl SchedulingDecision {
    /// Coarse confidence label for display.
    pub fn confidence_band(&self) -> &'static str {
        if self.confidence >= 0.66 {
            "high"
        } else if self.confidence >= 0.33 {
            "medium"
        } else {
            "low"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(confidence: f64) -> SchedulingDecision {
        SchedulingDecision {
            task_id: Uuid::new_v4(),
            task_name: "cache-prune".to_string(),
            operation: "cache-prune".to_string(),
            scheduled_time: Utc::now(),
            score: 100.0,
            reason: "quiet slot".to_string(),
            confidence,
            alternatives: Vec::new(),
            fallback: false,
        }
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(decision(0.9).confidence_band(), "high");
        assert_eq!(decision(0.5).confidence_band(), "medium");
        assert_eq!(decision(0.1).confidence_band(), "low");
        assert_eq!(decision(0.66).confidence_band(), "high");
        assert_eq!(decision(0.33).confidence_band(), "medium");
    }
}
