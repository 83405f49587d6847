//! Conflict resolution domain model.
//!
//! One record per conflicted file in a merge pass: the strategy chosen
//! for it, how confident the engine is in that strategy, and whether
//! the file was actually rewritten.

use serde::{Deserialize, Serialize};

/// How a conflicted file should be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Keep the local side of each conflict
    PreferLocal,
    /// Keep the incoming side of each conflict
    PreferRemote,
    /// Parse both sides and merge them structurally
    StructuredMerge,
    /// Hand the file to a human
    Escalate,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreferLocal => "prefer_local",
            Self::PreferRemote => "prefer_remote",
            Self::StructuredMerge => "structured_merge",
            Self::Escalate => "escalate",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prefer_local" | "prefer-local" | "local" => Some(Self::PreferLocal),
            "prefer_remote" | "prefer-remote" | "remote" => Some(Self::PreferRemote),
            "structured_merge" | "structured-merge" | "structured" => Some(Self::StructuredMerge),
            "escalate" => Some(Self::Escalate),
            _ => None,
        }
    }

    /// Confidence assigned to a resolution carried out with this
    /// strategy. A verified structural merge outranks the
    /// half-discarding heuristics; escalation carries none.
    pub fn base_confidence(&self) -> f64 {
        match self {
            Self::StructuredMerge => 0.9,
            Self::PreferLocal | Self::PreferRemote => 0.7,
            Self::Escalate => 0.0,
        }
    }

    /// Whether this strategy resolves the file without a human.
    pub fn is_automatic(&self) -> bool {
        !matches!(self, Self::Escalate)
    }
}

/// Outcome record for one conflicted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    /// Path of the conflicted file, relative to the work tree
    pub file: String,
    /// Strategy chosen (or downgraded to) for this file
    pub strategy: ResolutionStrategy,
    /// Confidence in the outcome, 0.0-1.0
    pub confidence: f64,
    /// Whether the file was rewritten and staged
    pub resolved: bool,
    /// Optional human-readable note about the outcome
    pub detail: Option<String>,
}

impl ConflictResolution {
    /// Record a freshly classified conflict, not yet acted on.
    pub fn classified(file: impl Into<String>, strategy: ResolutionStrategy) -> Self {
        Self {
            file: file.into(),
            strategy,
            confidence: strategy.base_confidence(),
            resolved: false,
            detail: None,
        }
    }

    /// Mark the file as rewritten and staged.
    pub fn mark_resolved(&mut self, detail: impl Into<String>) {
        self.resolved = true;
        self.detail = Some(detail.into());
    }

    /// Downgrade to escalation, leaving the file untouched.
    pub fn escalate(&mut self, detail: impl Into<String>) {
        self.strategy = ResolutionStrategy::Escalate;
        self.confidence = ResolutionStrategy::Escalate.base_confidence();
        self.resolved = false;
        self.detail = Some(detail.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_confidence_ordering() {
        assert!(
            ResolutionStrategy::StructuredMerge.base_confidence()
                > ResolutionStrategy::PreferLocal.base_confidence()
        );
        assert!((ResolutionStrategy::Escalate.base_confidence()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_escalation_downgrades_record() {
        let mut record = ConflictResolution::classified("app/config.json", ResolutionStrategy::PreferLocal);
        assert!((record.confidence - 0.7).abs() < f64::EPSILON);

        record.escalate("both sides unparseable");
        assert_eq!(record.strategy, ResolutionStrategy::Escalate);
        assert!(!record.resolved);
        assert!((record.confidence).abs() < f64::EPSILON);
    }

    #[test]
    fn test_strategy_round_trip() {
        for s in [
            ResolutionStrategy::PreferLocal,
            ResolutionStrategy::PreferRemote,
            ResolutionStrategy::StructuredMerge,
            ResolutionStrategy::Escalate,
        ] {
            assert_eq!(ResolutionStrategy::from_str(s.as_str()), Some(s));
        }
    }
}
