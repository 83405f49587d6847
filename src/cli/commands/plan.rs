//! Plan command: place every schedulable task over the lookahead horizon.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use comfy_table::Cell;

use crate::cli::display::{
    colorize_confidence, label, list_table, numeric_cell, output, render_list, truncate,
    CommandOutput,
};
use crate::domain::models::{Config, MaintenanceTask, MaintenanceWindow, SchedulingDecision};
use crate::services::planner::{PlanSummary, SchedulingPlanner};
use crate::services::{ActivityModel, OperationHistory, TaskRegistry};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Lookahead horizon in hours (overrides config)
    #[arg(long)]
    pub lookahead: Option<u32>,

    /// Plan from this instant instead of the current time (RFC3339)
    #[arg(long)]
    pub at: Option<String>,
}

// -- Output types --

#[derive(Debug, serde::Serialize)]
pub struct AlternativeOutput {
    pub time: String,
    pub score: f64,
}

#[derive(Debug, serde::Serialize)]
pub struct DecisionOutput {
    pub task: String,
    pub operation: String,
    pub scheduled_time: String,
    pub score: f64,
    pub confidence: f64,
    pub confidence_band: String,
    pub fallback: bool,
    pub reason: String,
    pub alternatives: Vec<AlternativeOutput>,
}

impl From<&SchedulingDecision> for DecisionOutput {
    fn from(decision: &SchedulingDecision) -> Self {
        Self {
            task: decision.task_name.clone(),
            operation: decision.operation.clone(),
            scheduled_time: decision.scheduled_time.to_rfc3339(),
            score: decision.score,
            confidence: decision.confidence,
            confidence_band: decision.confidence_band().to_string(),
            fallback: decision.fallback,
            reason: decision.reason.clone(),
            alternatives: decision
                .alternatives
                .iter()
                .map(|alt| AlternativeOutput { time: alt.time.to_rfc3339(), score: alt.score })
                .collect(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PlanOutput {
    pub now: String,
    pub lookahead_hours: u32,
    pub decisions: Vec<DecisionOutput>,
    pub summary: PlanSummary,
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["time", "task", "score", "confidence", "reason"]);
        for d in &self.decisions {
            let band = if d.fallback {
                format!("{} (fallback)", colorize_confidence(&d.confidence_band))
            } else {
                colorize_confidence(&d.confidence_band).to_string()
            };
            table.add_row(vec![
                Cell::new(&d.scheduled_time),
                Cell::new(&d.task),
                numeric_cell(format!("{:.1}", d.score)),
                Cell::new(band),
                Cell::new(truncate(&d.reason, 60)),
            ]);
        }

        let mut lines = vec![
            format!("{} {}h from {}", label("Plan horizon"), self.lookahead_hours, self.now),
            String::new(),
            render_list("decision", table, self.decisions.len()),
        ];

        if !self.decisions.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "{} high / {} medium / {} low confidence, {} fallback(s)",
                self.summary.high_confidence,
                self.summary.medium_confidence,
                self.summary.low_confidence,
                self.summary.fallbacks,
            ));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// -- Execute --

pub async fn execute(args: PlanArgs, config: &Config, json_mode: bool) -> Result<()> {
    let now = match &args.at {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .context("Invalid --at value. Use RFC3339 (e.g., 2025-01-01T00:00:00Z)")?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let lookahead = args.lookahead.unwrap_or(config.planner.lookahead_hours);

    let mut registry = TaskRegistry::new();
    for spec in &config.tasks {
        let task = MaintenanceTask::try_from(spec).map_err(anyhow::Error::msg)?;
        registry.add(task)?;
    }

    let windows = config
        .windows
        .iter()
        .map(MaintenanceWindow::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)?;

    let activity = ActivityModel::new();
    let history = OperationHistory::new();
    let planner = SchedulingPlanner::new(&activity, &history, &windows)
        .with_low_activity_threshold(config.planner.low_activity_threshold);

    let decisions = planner.plan(&registry.schedulable(), now, lookahead);

    let out = PlanOutput {
        now: now.to_rfc3339(),
        lookahead_hours: lookahead,
        summary: PlanSummary::of(&decisions),
        decisions: decisions.iter().map(DecisionOutput::from).collect(),
    };
    output(&out, json_mode);
    Ok(())
}
