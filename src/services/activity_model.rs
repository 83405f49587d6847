//! Repository activity model.
//!
//! Maintains a 24x7 table of estimated activity per (hour, weekday)
//! cell. The table starts from a parametric default curve (busy
//! weekday business hours, quiet nights and weekends) and blends in
//! observed events from the activity feed. A companion history tracks
//! per-operation success rates by time of day.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;

use crate::domain::models::{ActivityEvent, ActivityPattern};

/// Weight of a fresh observation when blending into an estimate.
pub const BLEND_WEIGHT: f64 = 0.3;

/// Activity points contributed by one observed event, capped at 100.
pub const ACTIVITY_PER_EVENT: f64 = 10.0;

/// Success rate assumed for operations with no recorded history.
pub const DEFAULT_SUCCESS_RATE: f64 = 0.5;

const HOURS: u32 = 24;
const DAYS: u32 = 7;

/// Hour-by-weekday activity estimates for one repository.
#[derive(Debug, Clone)]
pub struct ActivityModel {
    /// Dense 7x24 table, indexed weekday * 24 + hour.
    cells: Vec<ActivityPattern>,
}

impl Default for ActivityModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityModel {
    /// Create a model seeded with the parametric default curve.
    pub fn new() -> Self {
        let mut cells = Vec::with_capacity((HOURS * DAYS) as usize);
        for weekday in 0..DAYS {
            for hour in 0..HOURS {
                cells.push(ActivityPattern::with_activity(
                    hour,
                    weekday,
                    seeded_activity(hour, weekday),
                ));
            }
        }
        Self { cells }
    }

    /// The estimate for one cell. Out-of-range coordinates fall back
    /// to the uninformed prior rather than failing.
    pub fn activity_at(&self, hour: u32, weekday: u32) -> ActivityPattern {
        if hour < HOURS && weekday < DAYS {
            self.cells[(weekday * HOURS + hour) as usize].clone()
        } else {
            ActivityPattern::new(hour, weekday)
        }
    }

    /// Estimated activity level at an instant, 0-100.
    pub fn level_at(&self, at: DateTime<Utc>) -> f64 {
        self.activity_at(at.hour(), at.weekday().num_days_from_sunday())
            .average_activity
    }

    /// Whether the instant falls in a quiet cell.
    pub fn is_quiet(&self, at: DateTime<Utc>, threshold: f64) -> bool {
        self.level_at(at) <= threshold
    }

    /// Blend observed events into the estimates and accumulate raw
    /// counters. Cells with no events keep their current estimate.
    pub fn update(&mut self, events: &[ActivityEvent]) {
        let mut per_cell: HashMap<(u32, u32), u32> = HashMap::new();
        for event in events {
            let hour = event.hour();
            let weekday = event.weekday();
            *per_cell.entry((hour, weekday)).or_insert(0) += 1;
            if hour < HOURS && weekday < DAYS {
                self.cells[(weekday * HOURS + hour) as usize].record(event.kind);
            }
        }

        for ((hour, weekday), count) in &per_cell {
            if *hour >= HOURS || *weekday >= DAYS {
                continue;
            }
            let cell = &mut self.cells[(weekday * HOURS + hour) as usize];
            let observed = (f64::from(*count) * ACTIVITY_PER_EVENT).min(100.0);
            cell.average_activity =
                cell.average_activity * (1.0 - BLEND_WEIGHT) + observed * BLEND_WEIGHT;
        }

        debug!(
            events = events.len(),
            cells_touched = per_cell.len(),
            "Refreshed activity model"
        );
    }

    /// All cells in weekday-major order, for display.
    pub fn cells(&self) -> &[ActivityPattern] {
        &self.cells
    }
}

/// The parametric default curve: weekday business hours are busy,
/// nights are quiet, weekends run at a fraction of weekday levels.
fn seeded_activity(hour: u32, weekday: u32) -> f64 {
    let hourly: f64 = match hour {
        0..=5 => 10.0,
        6..=8 => 30.0,
        9..=17 => 85.0,
        18..=21 => 45.0,
        _ => 15.0,
    };
    // Sunday = 0, Saturday = 6.
    let day_factor = if weekday == 0 || weekday == 6 { 0.3 } else { 1.0 };
    (hourly * day_factor).clamp(0.0, 100.0)
}

/// Per-operation outcome ledger keyed by time of day.
///
/// Answers "how often has this operation succeeded when run at this
/// hour on this weekday", defaulting to [`DEFAULT_SUCCESS_RATE`] with
/// no history.
#[derive(Debug, Clone, Default)]
pub struct OperationHistory {
    outcomes: HashMap<(String, u32, u32), OutcomeStats>,
}

#[derive(Debug, Clone, Copy, Default)]
struct OutcomeStats {
    successes: u32,
    attempts: u32,
}

impl OperationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one run outcome.
    pub fn record(&mut self, operation: &str, at: DateTime<Utc>, success: bool) {
        let key = (
            operation.to_string(),
            at.hour(),
            at.weekday().num_days_from_sunday(),
        );
        let stats = self.outcomes.entry(key).or_default();
        stats.attempts += 1;
        if success {
            stats.successes += 1;
        }
    }

    /// Observed success rate for (operation, hour, weekday).
    pub fn success_rate(&self, operation: &str, hour: u32, weekday: u32) -> f64 {
        match self.outcomes.get(&(operation.to_string(), hour, weekday)) {
            Some(stats) if stats.attempts > 0 => {
                f64::from(stats.successes) / f64::from(stats.attempts)
            }
            _ => DEFAULT_SUCCESS_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ActivityKind;
    use chrono::TimeZone;

    #[test]
    fn test_seeded_curve_shape() {
        let model = ActivityModel::new();

        // Tuesday business hours are busy; Tuesday night is quiet.
        let busy = model.activity_at(14, 2).average_activity;
        let night = model.activity_at(3, 2).average_activity;
        assert!(busy > 80.0);
        assert!(night < 15.0);

        // Weekends run well below weekdays at the same hour.
        let saturday = model.activity_at(14, 6).average_activity;
        assert!(saturday < busy / 2.0);
    }

    #[test]
    fn test_out_of_range_falls_back_to_prior() {
        let model = ActivityModel::new();
        let cell = model.activity_at(99, 9);
        assert!((cell.average_activity - ActivityPattern::DEFAULT_ACTIVITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_blends_toward_observation() {
        let mut model = ActivityModel::new();
        // Tuesday 2025-06-03, 03:00: seeded estimate is 10.
        let at = Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap();
        let before = model.level_at(at);

        // Twelve commits in one hour: observed level capped at 100.
        let events: Vec<ActivityEvent> =
            (0..12).map(|_| ActivityEvent::new(ActivityKind::Commit, at)).collect();
        model.update(&events);

        let after = model.level_at(at);
        let expected = before * (1.0 - BLEND_WEIGHT) + 100.0 * BLEND_WEIGHT;
        assert!((after - expected).abs() < 1e-9);
        assert_eq!(model.activity_at(3, 2).commits, 12);
    }

    #[test]
    fn test_update_leaves_other_cells_alone() {
        let mut model = ActivityModel::new();
        let at = Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap();
        let untouched_before = model.activity_at(14, 2);

        model.update(&[ActivityEvent::new(ActivityKind::Review, at)]);

        assert_eq!(model.activity_at(14, 2), untouched_before);
    }

    #[test]
    fn test_update_is_safe_to_rerun_empty() {
        let mut model = ActivityModel::new();
        let snapshot = model.cells().to_vec();
        model.update(&[]);
        assert_eq!(model.cells(), snapshot.as_slice());
    }

    #[test]
    fn test_success_rate_defaults_and_learns() {
        let mut history = OperationHistory::new();
        assert!((history.success_rate("security-scan", 3, 2) - 0.5).abs() < f64::EPSILON);

        let at = Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap();
        history.record("security-scan", at, true);
        history.record("security-scan", at, true);
        history.record("security-scan", at, false);

        let rate = history.success_rate("security-scan", 3, 2);
        assert!((rate - 2.0 / 3.0).abs() < 1e-9);

        // Other hours still use the default.
        assert!((history.success_rate("security-scan", 4, 2) - 0.5).abs() < f64::EPSILON);
    }
}
