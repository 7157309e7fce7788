//! Release report

use serde::Serialize;

use crate::stage::Stage;

/// What happened in one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum StageOutcome {
    /// The stage ran
    Completed(String),
    /// The stage was disabled or had nothing to do
    Skipped(String),
    /// Dry run: the stage's mutations were logged instead of performed
    Rehearsed(String),
}

impl StageOutcome {
    /// Human-readable detail
    pub fn detail(&self) -> &str {
        match self {
            Self::Completed(d) | Self::Skipped(d) | Self::Rehearsed(d) => d,
        }
    }
}

/// A stage and its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub outcome: StageOutcome,
}

/// Result of a release run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReleaseReport {
    /// Package name
    pub package: String,
    /// Version before the run
    pub previous_version: String,
    /// Version after the run (planned, in a dry run)
    pub version: String,
    /// Distribution tag used for publishing
    pub dist_tag: String,
    /// Git tag for the release
    pub tag: Option<String>,
    /// Changelog block that was derived
    pub changelog: Option<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Per-stage outcomes, in execution order
    pub stages: Vec<StageRecord>,
}

impl ReleaseReport {
    /// Record a finished stage
    pub fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        self.stages.push(StageRecord { stage, outcome });
    }

    /// Outcome of a stage, if it ran
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }

    /// Whether the version changed
    pub fn bumped(&self) -> bool {
        self.previous_version != self.version
    }
}
