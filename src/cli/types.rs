//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::activity::ActivityArgs;
use crate::cli::commands::conflicts::ConflictsArgs;
use crate::cli::commands::plan::PlanArgs;
use crate::cli::commands::tasks::TasksArgs;

#[derive(Parser)]
#[command(name = "custodian")]
#[command(about = "Custodian - Activity-aware maintenance scheduler", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Path to a config file (overrides the discovery hierarchy)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a maintenance plan for the configured tasks
    Plan(PlanArgs),

    /// List configured maintenance tasks
    Tasks(TasksArgs),

    /// Detect merge conflicts and optionally resolve them
    Conflicts(ConflictsArgs),

    /// Show the learned activity profile
    Activity(ActivityArgs),
}
