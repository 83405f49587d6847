//! Tasks command: list the configured maintenance tasks.

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;

use crate::cli::display::{colorize_status, list_table, numeric_cell, output, render_list, CommandOutput};
use crate::domain::models::{Config, MaintenanceTask};
use crate::services::TaskRegistry;

#[derive(Args, Debug)]
pub struct TasksArgs {}

// -- Output types --

#[derive(Debug, serde::Serialize)]
pub struct TaskOutput {
    pub id: String,
    pub name: String,
    pub operation: String,
    pub status: String,
    pub priority: i32,
    pub recurrence: String,
    pub next_run: Option<String>,
    pub constraints: String,
}

impl From<&MaintenanceTask> for TaskOutput {
    fn from(task: &MaintenanceTask) -> Self {
        Self {
            id: task.id.to_string(),
            name: task.name.clone(),
            operation: task.operation.clone(),
            status: task.status.as_str().to_string(),
            priority: task.priority,
            recurrence: task.recurrence.description(),
            next_run: task.next_run.map(|t| t.to_rfc3339()),
            constraints: constraint_summary(task),
        }
    }
}

fn constraint_summary(task: &MaintenanceTask) -> String {
    let mut parts = Vec::new();
    if task.constraints.requires_low_activity {
        parts.push("quiet".to_string());
    }
    if task.constraints.requires_maintenance_window {
        parts.push("window".to_string());
    }
    if task.constraints.cooldown_minutes > 0 {
        parts.push(format!("cooldown {}m", task.constraints.cooldown_minutes));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TasksOutput {
    pub tasks: Vec<TaskOutput>,
    pub total: usize,
}

impl CommandOutput for TasksOutput {
    fn to_human(&self) -> String {
        let mut table =
            list_table(&["name", "operation", "status", "priority", "recurrence", "next run", "constraints"]);
        for t in &self.tasks {
            table.add_row(vec![
                Cell::new(&t.name),
                Cell::new(&t.operation),
                Cell::new(colorize_status(&t.status).to_string()),
                numeric_cell(t.priority),
                Cell::new(&t.recurrence),
                Cell::new(t.next_run.as_deref().unwrap_or("-")),
                Cell::new(&t.constraints),
            ]);
        }
        render_list("task", table, self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// -- Execute --

pub async fn execute(_args: TasksArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut registry = TaskRegistry::new();
    for spec in &config.tasks {
        let task = MaintenanceTask::try_from(spec).map_err(anyhow::Error::msg)?;
        registry.add(task)?;
    }

    let out = TasksOutput {
        total: registry.len(),
        tasks: registry.all().iter().map(TaskOutput::from).collect(),
    };
    output(&out, json_mode);
    Ok(())
}
