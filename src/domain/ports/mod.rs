//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - CommandRunner: external process execution with timeouts
//! - ActivityFeed: repository activity event ingestion
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod activity_feed;
pub mod command_runner;

pub use activity_feed::{ActivityFeed, NullActivityFeed};
pub use command_runner::{CommandRunner, ProcessOutput, RecordedCall, StaticCommandRunner};
