//! Launchpad Release - the release pipeline
//!
//! Ties package manifests, the registry client, git and the changelog engine
//! together into one ordered run: guards, build, bump, publish, sync,
//! changelog, commit/tag/push and the hosted release.

pub mod context;
pub mod github;
pub mod guards;
pub mod pipeline;
pub mod report;
pub mod reporter;
pub mod stage;

pub use context::{PipelineEnv, RepoContext};
pub use pipeline::ReleasePipeline;
pub use report::{ReleaseReport, StageOutcome, StageRecord};
pub use reporter::{NoopReporter, ReleaseReporter, VersionPrompt};
pub use stage::Stage;
