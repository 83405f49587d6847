//! Custodian - Activity-aware maintenance scheduler
//!
//! Custodian decides when repository maintenance should run and how merge
//! conflicts encountered along the way get resolved. It learns an
//! hour-by-weekday activity profile, scores candidate 15-minute slots per
//! task, and emits one placement decision per task with ranked alternatives.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Service Layer** (`services`): Scheduling, scoring, and conflict resolution
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, and process adapters
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use custodian::services::{ActivityModel, OperationHistory, SchedulingPlanner};
//!
//! let activity = ActivityModel::new();
//! let history = OperationHistory::new();
//! let planner = SchedulingPlanner::new(&activity, &history, &[]);
//! let decisions = planner.plan(&[], chrono::Utc::now(), 24);
//! assert!(decisions.is_empty());
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ActivityEvent, ActivityKind, ActivityPattern, Config, ConflictResolution, LoggingConfig,
    MaintenanceTask, MaintenanceWindow, PlannerConfig, Recurrence, ResolutionStrategy,
    SchedulingDecision, TaskStatus,
};
pub use domain::ports::{ActivityFeed, CommandRunner, ProcessOutput};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    ActivityModel, ConflictDetector, OperationHistory, ResolutionStrategist, SchedulingPlanner,
    SlotScorer, TaskRegistry,
};
