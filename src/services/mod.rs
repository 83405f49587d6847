pub mod activity_model;
pub mod conflict_detector;
pub mod planner;
pub mod resolution_strategist;
pub mod slot_scorer;
pub mod task_registry;

pub use activity_model::{ActivityModel, OperationHistory};
pub use conflict_detector::ConflictDetector;
pub use planner::{PlanSummary, SchedulingPlanner};
pub use resolution_strategist::ResolutionStrategist;
pub use slot_scorer::{SlotScore, SlotScorer};
pub use task_registry::TaskRegistry;
