//! Conflict detector.
//!
//! Scans line-oriented version-control status output for files left
//! unmerged by a merge attempt and classifies each one. Pure parsing,
//! no side effects; the strategist acts on the records afterwards.

use tracing::debug;

use crate::domain::models::ConflictResolution;
use crate::services::resolution_strategist::ResolutionStrategist;

/// Porcelain prefixes that mark a file as conflicted: modified by
/// both sides, added by both, or deleted by both.
const CONFLICT_PREFIXES: [&str; 3] = ["UU ", "AA ", "DD "];

/// Finds conflicted files in `git status --porcelain` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// One classified record per conflicted path, in input order.
    pub fn detect(&self, status_text: &str) -> Vec<ConflictResolution> {
        let mut records = Vec::new();
        for raw in status_text.lines() {
            let line = raw.trim_end();
            let Some(path) = conflict_path(line) else {
                continue;
            };
            let strategy = ResolutionStrategist::classify(path);
            debug!(path, strategy = strategy.as_str(), "Detected conflicted file");
            records.push(ConflictResolution::classified(path, strategy));
        }
        records
    }
}

fn conflict_path(line: &str) -> Option<&str> {
    CONFLICT_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(|path| unquote(path.trim()))
}

/// Porcelain quotes paths containing special characters.
fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ResolutionStrategy;

    #[test]
    fn test_detect_picks_out_unmerged_entries() {
        let status = "M  src/main.rs\n\
                      UU package.json\n\
                      AA config/settings.json\n\
                      DD legacy/notes.txt\n\
                      ?? scratch.txt\n";

        let detector = ConflictDetector::new();
        let records = detector.detect(status);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].file, "package.json");
        assert_eq!(records[0].strategy, ResolutionStrategy::StructuredMerge);
        assert_eq!(records[1].file, "config/settings.json");
        assert_eq!(records[1].strategy, ResolutionStrategy::PreferLocal);
        assert_eq!(records[2].file, "legacy/notes.txt");
        assert_eq!(records[2].strategy, ResolutionStrategy::PreferRemote);
        assert!(records.iter().all(|r| !r.resolved));
    }

    #[test]
    fn test_detect_ignores_clean_status() {
        let detector = ConflictDetector::new();
        assert!(detector.detect("").is_empty());
        assert!(detector.detect("M  src/lib.rs\nA  new.rs\n").is_empty());
    }

    #[test]
    fn test_detect_unquotes_paths() {
        let detector = ConflictDetector::new();
        let records = detector.detect("UU \"docs/release notes.md\"\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file, "docs/release notes.md");
        assert_eq!(records[0].strategy, ResolutionStrategy::PreferRemote);
    }

    #[test]
    fn test_detect_handles_crlf_lines() {
        let detector = ConflictDetector::new();
        let records = detector.detect("UU app/state.yaml\r\nDD README.md\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file, "app/state.yaml");
        assert_eq!(records[1].file, "README.md");
    }
}
