//! Conflicts command: detect merge conflicts and optionally resolve them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;

use crate::cli::display::{
    action_failure, action_success, colorize_strategy, list_table, output, render_list, truncate,
    CommandOutput,
};
use crate::domain::models::ConflictResolution;
use crate::domain::ports::CommandRunner;
use crate::infrastructure::process::ProcessRunner;
use crate::services::{ConflictDetector, ResolutionStrategist};

const GIT_STATUS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Args, Debug)]
pub struct ConflictsArgs {
    /// Apply automatic resolutions and stage the rewritten files
    #[arg(long)]
    pub apply: bool,

    /// Read porcelain status text from a file instead of running git
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Repository to inspect
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,
}

// -- Output types --

#[derive(Debug, serde::Serialize)]
pub struct ConflictOutput {
    pub file: String,
    pub strategy: String,
    pub confidence: f64,
    pub automatic: bool,
    pub resolved: bool,
    pub detail: Option<String>,
}

impl From<&ConflictResolution> for ConflictOutput {
    fn from(resolution: &ConflictResolution) -> Self {
        Self {
            file: resolution.file.clone(),
            strategy: resolution.strategy.as_str().to_string(),
            confidence: resolution.confidence,
            automatic: resolution.strategy.is_automatic(),
            resolved: resolution.resolved,
            detail: resolution.detail.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConflictsOutput {
    pub conflicts: Vec<ConflictOutput>,
    pub total: usize,
    pub resolved: usize,
    pub applied: bool,
}

impl CommandOutput for ConflictsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["file", "strategy", "confidence", "resolved", "detail"]);
        for c in &self.conflicts {
            let resolved = if !self.applied {
                "-".to_string()
            } else if c.resolved {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            };
            table.add_row(vec![
                Cell::new(&c.file),
                Cell::new(colorize_strategy(&c.strategy).to_string()),
                Cell::new(format!("{:.0}%", c.confidence * 100.0)),
                Cell::new(resolved),
                Cell::new(truncate(c.detail.as_deref().unwrap_or("-"), 60)),
            ]);
        }

        let mut rendered = render_list("conflict", table, self.total);
        if self.applied && self.total > 0 {
            let summary =
                format!("{} of {} conflicts resolved and staged", self.resolved, self.total);
            let line =
                if self.resolved > 0 { action_success(&summary) } else { action_failure(&summary) };
            rendered.push_str(&format!("\n\n{line}"));
        }
        rendered
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// -- Execute --

pub async fn execute(args: ConflictsArgs, json_mode: bool) -> Result<()> {
    let status_text = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read status from {}", path.display()))?,
        None => {
            let workdir = args.workdir.to_string_lossy().to_string();
            let status = ProcessRunner
                .run("git", &["-C", &workdir, "status", "--porcelain"], GIT_STATUS_TIMEOUT)
                .await?;
            if !status.success() {
                anyhow::bail!("git status failed: {}", status.stderr.trim());
            }
            status.stdout
        }
    };

    let mut resolutions = ConflictDetector::new().detect(&status_text);

    let mut resolved = 0;
    if args.apply && !resolutions.is_empty() {
        let strategist = ResolutionStrategist::new(Arc::new(ProcessRunner), args.workdir.clone());
        resolved = strategist.resolve_all(&mut resolutions).await?;
    }

    let out = ConflictsOutput {
        total: resolutions.len(),
        resolved,
        applied: args.apply,
        conflicts: resolutions.iter().map(ConflictOutput::from).collect(),
    };
    output(&out, json_mode);
    Ok(())
}
