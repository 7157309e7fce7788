//! Operator-facing seams of the pipeline

use launchpad_core::error::{LaunchpadError, Result};

use crate::report::StageOutcome;
use crate::stage::Stage;

/// Receives stage progress as the pipeline runs
pub trait ReleaseReporter {
    /// A stage is about to run
    fn stage_started(&self, _stage: Stage) {}

    /// A stage finished
    fn stage_finished(&self, _stage: Stage, _outcome: &StageOutcome) {}

    /// A stage failed; the pipeline stops after this
    fn stage_failed(&self, _stage: Stage, _error: &LaunchpadError) {}
}

/// Reporter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ReleaseReporter for NoopReporter {}

/// Asks the operator for an explicit version
pub trait VersionPrompt {
    /// Return the version to release, given the current one
    fn ask_version(&self, current: &semver::Version) -> Result<String>;
}
