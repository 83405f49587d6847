//! Maintenance scheduling planner.
//!
//! For each pending task, enumerates candidate slots on a 15-minute
//! grid across the lookahead horizon, filters out constraint
//! violations, scores the survivors, and picks the best slot with up
//! to three runner-ups. A final pass resolves cross-task collisions
//! by priority so no two tasks ever share a slot.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::models::{
    MaintenanceTask, MaintenanceWindow, ScheduleAlternative, SchedulingDecision,
};
use crate::services::activity_model::{ActivityModel, OperationHistory};
use crate::services::slot_scorer::SlotScorer;

/// Candidate slot granularity.
pub const SLOT_MINUTES: i64 = 15;

/// Step used when contention exhausts a task's alternatives.
const RESCHEDULE_DELAY_MINUTES: i64 = 30;

/// Confidence penalty for moving to a retained alternative.
const ALTERNATIVE_CONFIDENCE_FACTOR: f64 = 0.8;

/// Confidence penalty for the blind-delay fallback.
const DELAY_CONFIDENCE_FACTOR: f64 = 0.6;

const MAX_ALTERNATIVES: usize = 3;

/// The 15-minute bin an instant falls into.
pub fn slot_bin(at: DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(SLOT_MINUTES * 60)
}

/// Plans maintenance slots for pending tasks.
#[derive(Debug, Clone, Copy)]
pub struct SchedulingPlanner<'a> {
    activity: &'a ActivityModel,
    history: &'a OperationHistory,
    windows: &'a [MaintenanceWindow],
    low_activity_threshold: f64,
}

impl<'a> SchedulingPlanner<'a> {
    pub fn new(
        activity: &'a ActivityModel,
        history: &'a OperationHistory,
        windows: &'a [MaintenanceWindow],
    ) -> Self {
        Self { activity, history, windows, low_activity_threshold: 30.0 }
    }

    /// Override the activity level at or below which a slot counts as
    /// quiet for `requires_low_activity` tasks.
    pub fn with_low_activity_threshold(mut self, threshold: f64) -> Self {
        self.low_activity_threshold = threshold;
        self
    }

    /// Produce one decision per schedulable task, sorted by time.
    ///
    /// Deterministic for a fixed task set and fixed `now`. Tasks whose
    /// constraints admit no slot are returned as boundary fallbacks,
    /// never dropped.
    pub fn plan(
        &self,
        tasks: &[&MaintenanceTask],
        now: DateTime<Utc>,
        lookahead_hours: u32,
    ) -> Vec<SchedulingDecision> {
        let scorer = SlotScorer::new(self.activity, self.history, self.windows, now);
        let horizon = now + Duration::hours(i64::from(lookahead_hours));

        let mut decisions: Vec<SchedulingDecision> = Vec::with_capacity(tasks.len());
        for task in tasks {
            if !task.status.is_schedulable() || task.is_exhausted() {
                continue;
            }
            decisions.push(self.decide(task, &scorer, now, horizon, lookahead_hours));
        }

        decisions.sort_by_key(|d| d.scheduled_time);
        self.resolve_collisions(tasks, &mut decisions);
        decisions.sort_by_key(|d| d.scheduled_time);

        debug!(
            tasks = tasks.len(),
            decisions = decisions.len(),
            lookahead_hours,
            "Planned maintenance slots"
        );
        decisions
    }

    /// Pick the best slot for one task.
    fn decide(
        &self,
        task: &MaintenanceTask,
        scorer: &SlotScorer<'_>,
        now: DateTime<Utc>,
        horizon: DateTime<Utc>,
        lookahead_hours: u32,
    ) -> SchedulingDecision {
        let mut scored = Vec::new();
        let mut candidate = now;
        while candidate <= horizon {
            if self.satisfies_constraints(task, candidate) {
                scored.push((candidate, scorer.score(task, candidate)));
            }
            candidate += Duration::minutes(SLOT_MINUTES);
        }

        if scored.is_empty() {
            // Constraint-unsatisfiable: park at the horizon with zero
            // confidence rather than dropping the task.
            return SchedulingDecision {
                task_id: task.id,
                task_name: task.name.clone(),
                operation: task.operation.clone(),
                scheduled_time: horizon,
                score: 0.0,
                reason: format!(
                    "no slot satisfied constraints within {lookahead_hours}h lookahead; placed at boundary"
                ),
                confidence: 0.0,
                alternatives: Vec::new(),
                fallback: true,
            };
        }

        // Best score first; ties prefer the earlier slot.
        scored.sort_by(|a, b| b.1.total.total_cmp(&a.1.total).then_with(|| a.0.cmp(&b.0)));

        let (best_time, best) = &scored[0];
        let confidence = if scored.len() < 2 {
            1.0
        } else if best.total <= f64::EPSILON {
            0.0
        } else {
            (best.total - scored[1].1.total) / best.total
        };

        let alternatives = scored
            .iter()
            .skip(1)
            .take(MAX_ALTERNATIVES)
            .map(|(time, score)| ScheduleAlternative {
                time: *time,
                score: score.total,
                reason: score.reason(task),
            })
            .collect();

        SchedulingDecision {
            task_id: task.id,
            task_name: task.name.clone(),
            operation: task.operation.clone(),
            scheduled_time: *best_time,
            score: best.total,
            reason: best.reason(task),
            confidence,
            alternatives,
            fallback: false,
        }
    }

    fn satisfies_constraints(&self, task: &MaintenanceTask, candidate: DateTime<Utc>) -> bool {
        if task.constraints.requires_low_activity
            && !self.activity.is_quiet(candidate, self.low_activity_threshold)
        {
            return false;
        }

        if task.constraints.requires_maintenance_window
            && !self.windows.iter().any(|w| w.contains(candidate))
        {
            return false;
        }

        if task.constraints.cooldown_minutes > 0 {
            if let Some(last_run) = task.last_run {
                let since = candidate.signed_duration_since(last_run);
                if since < Duration::minutes(task.constraints.cooldown_minutes) {
                    return false;
                }
            }
        }

        true
    }

    /// Make the plan collision-free: higher priority keeps a contested
    /// slot; the loser moves to its first free alternative or, with
    /// none left, delays in 30-minute steps until a free slot appears.
    fn resolve_collisions(&self, tasks: &[&MaintenanceTask], decisions: &mut [SchedulingDecision]) {
        let priorities: HashMap<Uuid, i32> = tasks.iter().map(|t| (t.id, t.priority)).collect();
        let priority_of =
            |d: &SchedulingDecision| priorities.get(&d.task_id).copied().unwrap_or_default();

        // Claim slots in priority order so winners never move.
        let mut order: Vec<usize> = (0..decisions.len()).collect();
        order.sort_by(|&a, &b| {
            priority_of(&decisions[b])
                .cmp(&priority_of(&decisions[a]))
                .then_with(|| decisions[a].scheduled_time.cmp(&decisions[b].scheduled_time))
                .then_with(|| decisions[a].task_id.cmp(&decisions[b].task_id))
        });

        let mut occupied: HashSet<i64> = HashSet::new();
        for idx in order {
            let decision = &mut decisions[idx];
            if occupied.insert(slot_bin(decision.scheduled_time)) {
                continue;
            }

            let free_alt = decision
                .alternatives
                .iter()
                .position(|alt| !occupied.contains(&slot_bin(alt.time)));

            if let Some(pos) = free_alt {
                let alt = decision.alternatives.remove(pos);
                debug!(
                    task = %decision.task_name,
                    from = %decision.scheduled_time,
                    to = %alt.time,
                    "Rescheduled to alternative after slot contention"
                );
                decision.scheduled_time = alt.time;
                decision.score = alt.score;
                decision.reason = format!("{} (rescheduled by slot contention)", alt.reason);
                decision.confidence *= ALTERNATIVE_CONFIDENCE_FACTOR;
            } else {
                let mut delayed = decision.scheduled_time;
                loop {
                    delayed += Duration::minutes(RESCHEDULE_DELAY_MINUTES);
                    if !occupied.contains(&slot_bin(delayed)) {
                        break;
                    }
                }
                debug!(
                    task = %decision.task_name,
                    from = %decision.scheduled_time,
                    to = %delayed,
                    "Delayed after exhausting alternatives"
                );
                decision.scheduled_time = delayed;
                decision.reason = format!("{} (delayed by slot contention)", decision.reason);
                decision.confidence *= DELAY_CONFIDENCE_FACTOR;
            }
            occupied.insert(slot_bin(decision.scheduled_time));
        }
    }
}

/// Confidence-band counts over a finished plan, for display.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub total: usize,
    pub fallbacks: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
}

impl PlanSummary {
    pub fn of(decisions: &[SchedulingDecision]) -> Self {
        let mut summary = Self {
            total: decisions.len(),
            fallbacks: 0,
            high_confidence: 0,
            medium_confidence: 0,
            low_confidence: 0,
        };
        for decision in decisions {
            if decision.fallback {
                summary.fallbacks += 1;
            }
            match decision.confidence_band() {
                "high" => summary.high_confidence += 1,
                "medium" => summary.medium_confidence += 1,
                _ => summary.low_confidence += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskStatus;
    use chrono::{NaiveTime, TimeZone, Weekday};

    // Tuesday 2025-06-03 00:00 UTC.
    fn tuesday_midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap()
    }

    fn tight_window() -> MaintenanceWindow {
        // One 15-minute window: exactly one candidate slot qualifies.
        MaintenanceWindow::new(
            "tiny",
            NaiveTime::from_hms_opt(3, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(3, 15, 0).unwrap(),
            vec![Weekday::Tue],
        )
    }

    fn fixtures() -> (ActivityModel, OperationHistory) {
        (ActivityModel::new(), OperationHistory::new())
    }

    #[test]
    fn test_plan_returns_one_decision_per_task() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);

        let a = MaintenanceTask::new("a", "dependency-update");
        let b = MaintenanceTask::new("b", "branch-cleanup");
        let decisions = planner.plan(&[&a, &b], tuesday_midnight(), 24);

        assert_eq!(decisions.len(), 2);
        assert!(decisions.windows(2).all(|w| w[0].scheduled_time <= w[1].scheduled_time));
    }

    #[test]
    fn test_running_task_is_never_planned() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);

        let mut task = MaintenanceTask::new("busy", "db-compact");
        task.status = TaskStatus::Running;
        let decisions = planner.plan(&[&task], tuesday_midnight(), 24);
        assert!(decisions.is_empty());
    }

    #[test]
    fn test_higher_priority_wins_contested_slot() {
        let (activity, history) = fixtures();
        let windows = vec![tight_window()];
        let planner = SchedulingPlanner::new(&activity, &history, &windows);

        let urgent = MaintenanceTask::new("urgent", "security-scan")
            .with_priority(100)
            .requiring_window();
        let casual = MaintenanceTask::new("casual", "docs-regen")
            .with_priority(0)
            .requiring_window();

        let decisions = planner.plan(&[&casual, &urgent], tuesday_midnight(), 24);
        assert_eq!(decisions.len(), 2);

        let winner = decisions.iter().find(|d| d.task_name == "urgent").unwrap();
        let loser = decisions.iter().find(|d| d.task_name == "casual").unwrap();

        let slot = Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap();
        assert_eq!(winner.scheduled_time, slot);
        assert_ne!(loser.scheduled_time, slot);
        assert_ne!(slot_bin(winner.scheduled_time), slot_bin(loser.scheduled_time));

        // The loser had a single candidate, so it was delayed with the
        // stronger confidence penalty.
        assert!(loser.reason.contains("contention"));
        assert!((loser.confidence - DELAY_CONFIDENCE_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_cooldown_pushes_schedule_out() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);
        let now = tuesday_midnight();

        let mut task = MaintenanceTask::new("scan", "security-scan").with_priority(100);
        task.constraints.cooldown_minutes = 720;
        task.last_run = Some(now);

        let decisions = planner.plan(&[&task], now, 24);
        assert_eq!(decisions.len(), 1);
        assert!(!decisions[0].fallback);
        assert!(decisions[0].scheduled_time >= now + Duration::minutes(720));
    }

    #[test]
    fn test_unsatisfiable_task_gets_boundary_fallback() {
        let (activity, history) = fixtures();
        // Window requirement with no windows configured.
        let planner = SchedulingPlanner::new(&activity, &history, &[]);
        let now = tuesday_midnight();

        let task = MaintenanceTask::new("homeless", "db-compact").requiring_window();
        let decisions = planner.plan(&[&task], now, 24);

        assert_eq!(decisions.len(), 1);
        assert!(decisions[0].fallback);
        assert!((decisions[0].confidence).abs() < f64::EPSILON);
        assert_eq!(decisions[0].scheduled_time, now + Duration::hours(24));
    }

    #[test]
    fn test_low_activity_placement_is_quiet() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);
        let now = tuesday_midnight();

        let task = MaintenanceTask::new("cleanup", "branch-cleanup").requiring_low_activity();
        let decisions = planner.plan(&[&task], now, 24);

        assert_eq!(decisions.len(), 1);
        assert!(!decisions[0].fallback);
        assert!(activity.level_at(decisions[0].scheduled_time) <= 30.0);
    }

    #[test]
    fn test_alternatives_capped_at_three_and_ranked() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);

        let task = MaintenanceTask::new("deps", "dependency-update");
        let decisions = planner.plan(&[&task], tuesday_midnight(), 24);

        let decision = &decisions[0];
        assert!(decision.alternatives.len() <= 3);
        assert!(decision.alternatives.iter().all(|alt| alt.score <= decision.score));
        assert!(decision
            .alternatives
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);
        let now = tuesday_midnight();

        let a = MaintenanceTask::new("a", "dependency-update").with_priority(70);
        let b = MaintenanceTask::new("b", "branch-cleanup").with_priority(30).requiring_low_activity();

        let first = planner.plan(&[&a, &b], now, 24);
        let second = planner.plan(&[&a, &b], now, 24);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_collisions_among_equal_tasks() {
        let (activity, history) = fixtures();
        let windows = vec![tight_window()];
        let planner = SchedulingPlanner::new(&activity, &history, &windows);
        let now = tuesday_midnight();

        let tasks: Vec<MaintenanceTask> = (0..5)
            .map(|i| {
                MaintenanceTask::new(format!("t{i}"), "db-compact")
                    .with_priority(50)
                    .requiring_window()
            })
            .collect();
        let refs: Vec<&MaintenanceTask> = tasks.iter().collect();

        let decisions = planner.plan(&refs, now, 24);
        assert_eq!(decisions.len(), 5);

        let bins: HashSet<i64> = decisions.iter().map(|d| slot_bin(d.scheduled_time)).collect();
        assert_eq!(bins.len(), 5, "every decision gets a distinct slot");
    }

    #[test]
    fn test_summary_counts_bands() {
        let (activity, history) = fixtures();
        let planner = SchedulingPlanner::new(&activity, &history, &[]);
        let now = tuesday_midnight();

        let sure = MaintenanceTask::new("sure", "scan").requiring_window();
        let decisions = planner.plan(&[&sure], now, 24);
        let summary = PlanSummary::of(&decisions);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.fallbacks, 1);
        assert_eq!(summary.low_confidence, 1);
    }
}
