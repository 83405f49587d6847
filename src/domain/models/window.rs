//! Maintenance window domain model.
//!
//! Windows are static configuration naming the time-of-day ranges on
//! given weekdays where maintenance is welcome. A window whose end is
//! at or before its start wraps past midnight into the next day.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A recurring weekly time range that invites maintenance work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    /// Human-readable name (e.g. "overnight")
    pub name: String,
    /// Start time of day, inclusive
    pub start: NaiveTime,
    /// End time of day, exclusive
    pub end: NaiveTime,
    /// Weekdays on which the window opens
    #[serde(with = "weekday_list")]
    pub days: Vec<Weekday>,
    /// Preference weight when windows overlap, higher preferred
    pub priority: i32,
}

impl MaintenanceWindow {
    pub fn new(
        name: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
        days: Vec<Weekday>,
    ) -> Self {
        Self { name: name.into(), start, end, days, priority: 0 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this window runs past midnight into the following day.
    pub fn wraps_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the given instant falls inside this window.
    ///
    /// A wrapping window opening on Saturday at 23:00 until 02:00
    /// covers Saturday 23:00 through Sunday 02:00; the post-midnight
    /// leg is attributed to the day the window opened on.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let time = at.time();
        let day = at.weekday();

        if self.wraps_midnight() {
            let opens_today = self.days.contains(&day) && time >= self.start;
            let spills_from_yesterday = self.days.contains(&day.pred()) && time < self.end;
            opens_today || spills_from_yesterday
        } else {
            self.days.contains(&day) && time >= self.start && time < self.end
        }
    }

    /// Render the time range for display, e.g. "01:00-05:00".
    pub fn time_range(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Short lowercase weekday names, matching the config file syntax.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

mod weekday_list {
    use chrono::Weekday;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_seq(days.iter().map(|d| super::weekday_abbrev(*d)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Weekday>, D::Error> {
        let names = Vec::<String>::deserialize(de)?;
        names
            .iter()
            .map(|name| name.parse::<Weekday>().map_err(|_| D::Error::custom(format!("invalid weekday: {name}"))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_plain_window_contains() {
        let window = MaintenanceWindow::new(
            "overnight",
            time(1, 0),
            time(5, 0),
            vec![Weekday::Mon, Weekday::Tue],
        );

        // 2025-06-02 was a Monday.
        let inside = Utc.with_ymd_and_hms(2025, 6, 2, 3, 30, 0).unwrap();
        assert!(window.contains(inside));

        let before = Utc.with_ymd_and_hms(2025, 6, 2, 0, 59, 0).unwrap();
        assert!(!window.contains(before));

        // End is exclusive.
        let at_end = Utc.with_ymd_and_hms(2025, 6, 2, 5, 0, 0).unwrap();
        assert!(!window.contains(at_end));

        // Right weekday, wrong day list.
        let sunday = Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap();
        assert!(!window.contains(sunday));
    }

    #[test]
    fn test_wrapping_window_spills_into_next_day() {
        let window =
            MaintenanceWindow::new("late-night", time(23, 0), time(2, 0), vec![Weekday::Sat]);
        assert!(window.wraps_midnight());

        // 2025-06-07 was a Saturday, 06-08 a Sunday.
        let sat_night = Utc.with_ymd_and_hms(2025, 6, 7, 23, 30, 0).unwrap();
        assert!(window.contains(sat_night));

        let sun_early = Utc.with_ymd_and_hms(2025, 6, 8, 1, 30, 0).unwrap();
        assert!(window.contains(sun_early));

        let sun_late = Utc.with_ymd_and_hms(2025, 6, 8, 3, 0, 0).unwrap();
        assert!(!window.contains(sun_late));

        // Saturday before the window opens is outside.
        let sat_noon = Utc.with_ymd_and_hms(2025, 6, 7, 12, 0, 0).unwrap();
        assert!(!window.contains(sat_noon));
    }

    #[test]
    fn test_weekday_list_round_trips_through_serde() {
        let window =
            MaintenanceWindow::new("weekend", time(8, 0), time(18, 0), vec![Weekday::Sat, Weekday::Sun]);
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains("\"sat\""));
        let back: MaintenanceWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.days, vec![Weekday::Sat, Weekday::Sun]);
    }
}
