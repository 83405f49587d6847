//! Activity feed port - interface for repository event ingestion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::ActivityEvent;

/// Trait for sources of repository activity events.
///
/// The activity model periodically pulls recent commits, reviews,
/// and issue events through this port to refresh its hour-by-weekday
/// estimates. Where the events come from (VCS log, forge API, replay
/// file) is an adapter concern.
#[async_trait]
pub trait ActivityFeed: Send + Sync {
    /// Events observed at or after the given instant.
    async fn events_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<ActivityEvent>>;
}

/// A feed that never reports events.
///
/// Use this when running offline or in tests; the activity model then
/// keeps its seeded estimates.
#[derive(Debug, Clone, Default)]
pub struct NullActivityFeed;

impl NullActivityFeed {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActivityFeed for NullActivityFeed {
    async fn events_since(&self, _since: DateTime<Utc>) -> DomainResult<Vec<ActivityEvent>> {
        Ok(Vec::new())
    }
}
