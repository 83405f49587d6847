//! CLI command implementations.

pub mod activity;
pub mod conflicts;
pub mod plan;
pub mod tasks;
