pub mod activity;
pub mod config;
pub mod decision;
pub mod resolution;
pub mod task;
pub mod window;

pub use activity::{ActivityEvent, ActivityKind, ActivityPattern};
pub use config::{Config, LoggingConfig, PlannerConfig, TaskSpec, WindowSpec};
pub use decision::{ScheduleAlternative, SchedulingDecision};
pub use resolution::{ConflictResolution, ResolutionStrategy};
pub use task::{MaintenanceTask, Recurrence, TaskConstraints, TaskStatus};
pub use window::{weekday_abbrev, MaintenanceWindow};
