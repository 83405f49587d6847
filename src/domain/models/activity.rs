//! Repository activity domain model.
//!
//! Activity is tracked per (hour, weekday) cell on a 0-100 scale and
//! feeds the scheduler's notion of quiet and busy periods. Weekdays
//! are numbered 0-6 with Sunday as 0.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Kind of repository event observed by the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commit,
    Review,
    Issue,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Review => "review",
            Self::Issue => "issue",
        }
    }
}

/// A single observed repository event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(kind: ActivityKind, at: DateTime<Utc>) -> Self {
        Self { kind, at }
    }

    /// Hour-of-day of the event (0-23).
    pub fn hour(&self) -> u32 {
        self.at.hour()
    }

    /// Weekday of the event (0-6, Sunday = 0).
    pub fn weekday(&self) -> u32 {
        self.at.weekday().num_days_from_sunday()
    }
}

/// Estimated activity for one (hour, weekday) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPattern {
    /// Hour of day, 0-23
    pub hour: u32,
    /// Day of week, 0-6 with Sunday as 0
    pub weekday: u32,
    /// Estimated activity on a 0-100 scale
    pub average_activity: f64,
    /// Raw observed commit count
    pub commits: u32,
    /// Raw observed review count
    pub reviews: u32,
    /// Raw observed issue count
    pub issues: u32,
}

impl ActivityPattern {
    /// The uninformed prior for cells with no observations.
    pub const DEFAULT_ACTIVITY: f64 = 50.0;

    /// Create a cell at the uninformed prior.
    pub fn new(hour: u32, weekday: u32) -> Self {
        Self {
            hour,
            weekday,
            average_activity: Self::DEFAULT_ACTIVITY,
            commits: 0,
            reviews: 0,
            issues: 0,
        }
    }

    /// Create a cell with a given activity estimate.
    pub fn with_activity(hour: u32, weekday: u32, average_activity: f64) -> Self {
        Self { hour, weekday, average_activity, commits: 0, reviews: 0, issues: 0 }
    }

    /// Total raw events observed in this cell.
    pub fn observed_events(&self) -> u32 {
        self.commits + self.reviews + self.issues
    }

    /// Bump the raw counter for one event kind.
    pub fn record(&mut self, kind: ActivityKind) {
        match kind {
            ActivityKind::Commit => self.commits += 1,
            ActivityKind::Review => self.reviews += 1,
            ActivityKind::Issue => self.issues += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_cell_is_uninformed_prior() {
        let cell = ActivityPattern::new(3, 0);
        assert!((cell.average_activity - 50.0).abs() < f64::EPSILON);
        assert_eq!(cell.observed_events(), 0);
    }

    #[test]
    fn test_event_weekday_is_sunday_zero() {
        // 2025-06-01 was a Sunday.
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap();
        let event = ActivityEvent::new(ActivityKind::Commit, at);
        assert_eq!(event.weekday(), 0);
        assert_eq!(event.hour(), 14);
    }

    #[test]
    fn test_record_bumps_matching_counter() {
        let mut cell = ActivityPattern::new(10, 2);
        cell.record(ActivityKind::Commit);
        cell.record(ActivityKind::Commit);
        cell.record(ActivityKind::Issue);
        assert_eq!(cell.commits, 2);
        assert_eq!(cell.reviews, 0);
        assert_eq!(cell.issues, 1);
        assert_eq!(cell.observed_events(), 3);
    }
}
