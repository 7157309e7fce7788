//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, VersionError};
use crate::types::{BumpMode, GitTagStyle, NpmClient, PublishClient, ReleaseType};

use super::defaults::{DEFAULT_CHANGELOG_FILE, DEFAULT_TRANSLATED_CHANGELOG_FILE};

/// Options for one release run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Package manager for scripts and installs
    pub npm_client: NpmClient,

    /// Client that publishes to the registry
    pub publish_client: PublishClient,

    /// Require a clean worktree
    pub check_git_status: bool,

    /// Require the current registry user to own the package
    pub check_ownership: bool,

    /// Run the build script before publishing
    pub build: bool,

    /// Bump token (`patch`, `minor`, `major`, `prompt`) or `false`
    pub bump: BumpSetting,

    /// Explicit distribution tag
    pub dist_tag: Option<String>,

    /// Git tag naming
    pub git_tag: GitTagStyle,

    /// Comma-separated globs of consumer manifests whose dependency on this
    /// package is rewritten
    pub sync_deps: Option<String>,

    /// Comma-separated globs of manifests whose `version` mirrors this package
    pub sync_versions: Option<String>,

    /// Comma-separated satellite package directories published alongside
    pub sync_publishes: Option<String>,

    /// Skip every mutation
    pub dry_run: bool,

    /// Create a release on the hosting platform
    pub github_release: bool,

    /// Regenerate the changelog
    pub changelog: bool,

    /// Changelog file, relative to the package directory
    pub changelog_file: PathBuf,

    /// Translated changelog file, relative to the package directory
    pub translated_changelog_file: PathBuf,

    /// Git remote to push to
    pub remote: String,

    /// Pass `-n` to `git commit` so commit hooks do not run
    pub no_verify: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            npm_client: NpmClient::default(),
            publish_client: PublishClient::default(),
            check_git_status: true,
            check_ownership: false,
            build: true,
            bump: BumpSetting::default(),
            dist_tag: None,
            git_tag: GitTagStyle::default(),
            sync_deps: None,
            sync_versions: None,
            sync_publishes: None,
            dry_run: false,
            github_release: false,
            changelog: true,
            changelog_file: PathBuf::from(DEFAULT_CHANGELOG_FILE),
            translated_changelog_file: PathBuf::from(DEFAULT_TRANSLATED_CHANGELOG_FILE),
            remote: "origin".to_string(),
            no_verify: true,
        }
    }
}

impl ReleaseConfig {
    /// Resolve the bump setting into a mode, rejecting unknown tokens
    pub fn bump_mode(&self) -> Result<BumpMode> {
        self.bump.resolve()
    }
}

/// Raw bump setting as written in config files or on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BumpSetting {
    /// `false` disables bumping, `true` means the default bump
    Enabled(bool),
    /// A bump token
    Token(String),
}

impl Default for BumpSetting {
    fn default() -> Self {
        Self::Token(ReleaseType::Patch.as_str().to_string())
    }
}

impl BumpSetting {
    /// Resolve into a bump mode
    pub fn resolve(&self) -> Result<BumpMode> {
        match self {
            Self::Enabled(false) => Ok(BumpMode::Skip),
            Self::Enabled(true) => Ok(BumpMode::Release(ReleaseType::Patch)),
            Self::Token(token) if token.is_empty() => Ok(BumpMode::Release(ReleaseType::Patch)),
            Self::Token(token) => BumpMode::parse(token)
                .ok_or_else(|| VersionError::InvalidBumpType(token.clone()).into()),
        }
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
