//! Activity command: render the hour-by-weekday activity profile.

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, Utc};
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;

use crate::cli::display::{list_table, numeric_cell, output, section_header, CommandOutput};
use crate::domain::models::{
    weekday_abbrev, ActivityEvent, ActivityKind, ActivityPattern, Config, MaintenanceWindow,
};
use crate::services::ActivityModel;

const WEEKDAY_HEADERS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Activity level at or above which a cell renders as busy.
const BUSY_LEVEL: f64 = 70.0;

#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Blend a week of synthetic weekday activity into the profile
    #[arg(long)]
    pub seed_demo: bool,
}

// -- Output types --

#[derive(Debug, serde::Serialize)]
pub struct WindowOutput {
    pub name: String,
    pub hours: String,
    pub days: Vec<String>,
    pub priority: i32,
}

impl From<&MaintenanceWindow> for WindowOutput {
    fn from(window: &MaintenanceWindow) -> Self {
        Self {
            name: window.name.clone(),
            hours: window.time_range(),
            days: window.days.iter().map(|d| weekday_abbrev(*d).to_string()).collect(),
            priority: window.priority,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ActivityOutput {
    pub quiet_threshold: f64,
    pub seeded_demo: bool,
    /// Configured maintenance windows, for reading the table against.
    pub windows: Vec<WindowOutput>,
    /// Cells in weekday-major order (weekday * 24 + hour).
    pub cells: Vec<ActivityPattern>,
}

impl ActivityOutput {
    fn level(&self, hour: usize, weekday: usize) -> f64 {
        self.cells[weekday * 24 + hour].average_activity
    }
}

impl CommandOutput for ActivityOutput {
    fn to_human(&self) -> String {
        let mut headers = vec!["hour"];
        headers.extend(WEEKDAY_HEADERS);
        let mut table = list_table(&headers);

        for hour in 0..24 {
            let mut row = vec![numeric_cell(format!("{hour:02}"))];
            for weekday in 0..7 {
                let level = self.level(hour, weekday);
                let text = format!("{level:>3.0}");
                let colored = if level <= self.quiet_threshold {
                    text.green()
                } else if level >= BUSY_LEVEL {
                    text.red()
                } else {
                    text.yellow()
                };
                row.push(Cell::new(colored.to_string()));
            }
            table.add_row(row);
        }

        let mut rendered = format!(
            "Activity profile, 0-100 per hour x weekday (quiet at <= {:.0}):\n\n{}",
            self.quiet_threshold, table
        );

        if !self.windows.is_empty() {
            let mut windows = list_table(&["name", "hours", "days", "priority"]);
            for w in &self.windows {
                windows.add_row(vec![
                    Cell::new(&w.name),
                    Cell::new(&w.hours),
                    Cell::new(w.days.join(" ")),
                    numeric_cell(w.priority),
                ]);
            }
            rendered.push_str(&format!("\n{}\n{}", section_header("Maintenance windows"), windows));
        }
        rendered
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A deterministic week of weekday office-hours events, for demoing
/// how observations reshape the seeded curve.
fn demo_events(now: DateTime<Utc>) -> Vec<ActivityEvent> {
    let mut events = Vec::new();
    for days_back in 0..7 {
        let day = now - Duration::days(days_back);
        let weekday = day.weekday().num_days_from_sunday();
        if weekday == 0 || weekday == 6 {
            continue;
        }
        for hour in [10, 11, 14, 15, 16] {
            if let Some(at) = day.date_naive().and_hms_opt(hour, 0, 0) {
                let at = at.and_utc();
                for _ in 0..3 {
                    events.push(ActivityEvent::new(ActivityKind::Commit, at));
                }
            }
        }
        if let Some(at) = day.date_naive().and_hms_opt(13, 0, 0) {
            events.push(ActivityEvent::new(ActivityKind::Review, at.and_utc()));
        }
    }
    events
}

// -- Execute --

pub async fn execute(args: ActivityArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut model = ActivityModel::new();
    if args.seed_demo {
        model.update(&demo_events(Utc::now()));
    }

    let windows = config
        .windows
        .iter()
        .map(MaintenanceWindow::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)?;

    let out = ActivityOutput {
        quiet_threshold: config.planner.low_activity_threshold,
        seeded_demo: args.seed_demo,
        windows: windows.iter().map(WindowOutput::from).collect(),
        cells: model.cells().to_vec(),
    };
    output(&out, json_mode);
    Ok(())
}
