//! Release stages

use serde::Serialize;

/// A named step of the release pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Load the manifest, inspect the repository, validate every input
    Init,
    /// Clean tree, registry access and ownership checks
    GuardChecks,
    /// Build and doctor scripts
    Build,
    /// Compute and write the next version
    VersionBump,
    /// Publish the main package
    Publish,
    /// Rewrite consumer dependencies on the package
    SyncDeps,
    /// Mirror the version into sibling manifests
    SyncVersions,
    /// Publish satellite packages
    SyncPublishes,
    /// Prepend the changelog block, and its translation
    Changelog,
    /// Install, commit, tag and push
    GitFinalize,
    /// Create the hosted release
    GithubRelease,
}

impl Stage {
    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::GuardChecks => "guard-checks",
            Self::Build => "build",
            Self::VersionBump => "version-bump",
            Self::Publish => "publish",
            Self::SyncDeps => "sync-deps",
            Self::SyncVersions => "sync-versions",
            Self::SyncPublishes => "sync-publishes",
            Self::Changelog => "changelog",
            Self::GitFinalize => "git-finalize",
            Self::GithubRelease => "github-release",
        }
    }

    /// Get all stages in order
    pub fn all() -> &'static [Stage] {
        &[
            Self::Init,
            Self::GuardChecks,
            Self::Build,
            Self::VersionBump,
            Self::Publish,
            Self::SyncDeps,
            Self::SyncVersions,
            Self::SyncPublishes,
            Self::Changelog,
            Self::GitFinalize,
            Self::GithubRelease,
        ]
    }

    /// Whether a failure here leaves the repository or registry modified
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::Init | Self::GuardChecks)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
