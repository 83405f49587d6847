//! Resolution strategist.
//!
//! Classifies conflicted files by role and carries out the chosen
//! strategy: keep one side of each conflict hunk, merge structured
//! documents key-by-key, or leave the file for a human. A file is
//! only ever rewritten with fully-formed content; any parse or merge
//! failure downgrades the record to escalation and touches nothing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{ConflictResolution, ResolutionStrategy};
use crate::domain::ports::CommandRunner;

const CONFIG_SUFFIXES: [&str; 5] = [".json", ".yml", ".yaml", ".env", ".config"];
const DOC_SUFFIXES: [&str; 3] = [".md", ".txt", ".rst"];
const SOURCE_SUFFIXES: [&str; 17] = [
    ".ts", ".tsx", ".js", ".jsx", ".rs", ".go", ".py", ".java", ".c", ".h", ".cpp", ".hpp",
    ".rb", ".kt", ".swift", ".cs", ".sh",
];

/// Name marker for dependency manifests, which take precedence over
/// the generic configuration rule.
const MANIFEST_MARKER: &str = "package.json";

const STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Applies resolution strategies to conflicted files in a work tree.
pub struct ResolutionStrategist {
    runner: Arc<dyn CommandRunner>,
    workdir: PathBuf,
    stage_timeout: Duration,
}

impl ResolutionStrategist {
    pub fn new(runner: Arc<dyn CommandRunner>, workdir: impl Into<PathBuf>) -> Self {
        Self { runner, workdir: workdir.into(), stage_timeout: STAGE_TIMEOUT }
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Pick a strategy for a path. First match wins; dependency
    /// manifests are checked before the generic configuration
    /// suffixes that would otherwise swallow them.
    pub fn classify(path: &str) -> ResolutionStrategy {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.contains(MANIFEST_MARKER) {
            return ResolutionStrategy::StructuredMerge;
        }
        if CONFIG_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return ResolutionStrategy::PreferLocal;
        }
        if DOC_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return ResolutionStrategy::PreferRemote;
        }
        if SOURCE_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            // Merging program logic automatically is refused outright.
            return ResolutionStrategy::Escalate;
        }
        ResolutionStrategy::Escalate
    }

    /// Carry out the record's strategy against the work tree.
    ///
    /// The record is updated in place: `resolved` flips on when the
    /// file was rewritten and staged. Any failure before the rewrite
    /// downgrades the record to escalation with the file untouched; a
    /// staging failure keeps the rewritten file but reports the record
    /// unresolved. Only a transport failure in the command runner
    /// surfaces as an error.
    pub async fn resolve(&self, resolution: &mut ConflictResolution) -> DomainResult<()> {
        if resolution.strategy == ResolutionStrategy::Escalate {
            if resolution.detail.is_none() {
                resolution.detail = Some("manual resolution required".to_string());
            }
            return Ok(());
        }

        let path = self.workdir.join(&resolution.file);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                resolution.escalate(format!("could not read file: {err}"));
                return Ok(());
            }
        };

        let Some(sides) = split_conflict_sides(&content) else {
            resolution.escalate("no well-formed conflict markers found");
            return Ok(());
        };

        let rewritten = match merge_sides(&sides, resolution.strategy) {
            Ok(rewritten) => rewritten,
            Err(detail) => {
                resolution.escalate(detail);
                return Ok(());
            }
        };

        if let Err(err) = write_atomic(&path, &rewritten.content).await {
            resolution.escalate(format!("could not write resolution: {err}"));
            return Ok(());
        }

        let workdir = self.workdir.to_string_lossy();
        let staged = self
            .runner
            .run(
                "git",
                &["-C", workdir.as_ref(), "add", "--", resolution.file.as_str()],
                self.stage_timeout,
            )
            .await?;

        if staged.success() {
            debug!(file = %resolution.file, strategy = resolution.strategy.as_str(), "Resolved conflict");
            resolution.mark_resolved(rewritten.summary);
        } else {
            resolution.resolved = false;
            resolution.detail =
                Some(format!("resolution written but staging failed: {}", staged.stderr.trim()));
        }
        Ok(())
    }

    /// Resolve every record in the pass, returning how many files
    /// ended up rewritten and staged.
    pub async fn resolve_all(
        &self,
        resolutions: &mut [ConflictResolution],
    ) -> DomainResult<usize> {
        let mut resolved = 0;
        for resolution in resolutions.iter_mut() {
            self.resolve(resolution).await?;
            if resolution.resolved {
                resolved += 1;
            }
        }
        info!(
            total = resolutions.len(),
            resolved,
            escalated = resolutions.len() - resolved,
            "Finished conflict resolution pass"
        );
        Ok(resolved)
    }
}

/// Both full versions of a conflicted file, reconstructed from its
/// conflict hunks: shared lines plus each side's half of every hunk.
struct ConflictSides {
    local: String,
    remote: String,
}

/// Rewritten file content plus a short note for the record.
#[derive(Debug)]
struct Rewritten {
    content: String,
    summary: String,
}

enum Region {
    Common,
    Local,
    Remote,
}

/// Split a conflicted file into its two versions. Returns `None`
/// when the file has no hunks or the markers are malformed.
fn split_conflict_sides(content: &str) -> Option<ConflictSides> {
    let mut local = String::new();
    let mut remote = String::new();
    let mut region = Region::Common;
    let mut hunks = 0;

    for line in content.lines() {
        if line.starts_with("<<<<<<<") {
            if !matches!(region, Region::Common) {
                return None;
            }
            region = Region::Local;
            hunks += 1;
            continue;
        }
        if line == "=======" && matches!(region, Region::Local) {
            region = Region::Remote;
            continue;
        }
        if line.starts_with(">>>>>>>") {
            if !matches!(region, Region::Remote) {
                return None;
            }
            region = Region::Common;
            continue;
        }

        match region {
            Region::Common => {
                local.push_str(line);
                local.push('\n');
                remote.push_str(line);
                remote.push('\n');
            }
            Region::Local => {
                local.push_str(line);
                local.push('\n');
            }
            Region::Remote => {
                remote.push_str(line);
                remote.push('\n');
            }
        }
    }

    if hunks == 0 || !matches!(region, Region::Common) {
        return None;
    }
    Some(ConflictSides { local, remote })
}

fn merge_sides(sides: &ConflictSides, strategy: ResolutionStrategy) -> Result<Rewritten, String> {
    match strategy {
        ResolutionStrategy::PreferLocal | ResolutionStrategy::PreferRemote => {
            // When both versions parse as JSON, merge them structurally
            // with the preferred side's values winning shared leaves, so
            // structural additions from the discarded side survive.
            let parsed = (
                serde_json::from_str::<Value>(&sides.local),
                serde_json::from_str::<Value>(&sides.remote),
            );
            if let (Ok(local), Ok(remote)) = parsed {
                let (merged, side) = if strategy == ResolutionStrategy::PreferLocal {
                    (deep_merge(remote, local), "local")
                } else {
                    (deep_merge(local, remote), "incoming")
                };
                return Ok(Rewritten {
                    content: render_json(&merged)?,
                    summary: format!("merged structurally, {side} values preferred"),
                });
            }

            let (content, side) = if strategy == ResolutionStrategy::PreferLocal {
                (sides.local.clone(), "local")
            } else {
                (sides.remote.clone(), "incoming")
            };
            Ok(Rewritten { content, summary: format!("kept {side} side of each conflict") })
        }
        ResolutionStrategy::StructuredMerge => {
            let local: Value = serde_json::from_str(&sides.local)
                .map_err(|err| format!("local side is not valid JSON: {err}"))?;
            let remote: Value = serde_json::from_str(&sides.remote)
                .map_err(|err| format!("incoming side is not valid JSON: {err}"))?;
            let merged = deep_merge(local, remote);
            Ok(Rewritten {
                content: render_json(&merged)?,
                summary: "merged both sides structurally".to_string(),
            })
        }
        ResolutionStrategy::Escalate => Err("manual resolution required".to_string()),
    }
}

/// Recursive key-by-key merge. Nested objects merge; for any other
/// clash the overlay value wins.
fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, overlay_value) in overlay {
                let merged = match base.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

fn render_json(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|text| text + "\n")
        .map_err(|err| format!("could not serialize merged document: {err}"))
}

/// Write through a sibling temp file so the target is never left
/// half-written.
async fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let mut tmp_name = path
        .file_name()
        .map_or_else(|| OsString::from("resolved"), ToOwned::to_owned);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, content).await?;
    fs::rename(&tmp, path).await
}
