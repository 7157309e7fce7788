//! Error types for Launchpad

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LaunchpadError
pub type Result<T> = std::result::Result<T, LaunchpadError>;

/// Main error type for Launchpad operations
#[derive(Debug, Error)]
pub enum LaunchpadError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Manifest-related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// External command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Workflow-related errors
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Working directory is not clean
    #[error("git status is not clean: {0}")]
    DirtyWorkingDirectory(String),

    /// HEAD is not on a branch
    #[error("HEAD is detached or unborn; releases must run from a branch")]
    NoBranch,

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Remote URL could not be mapped to owner/name
    #[error("Cannot derive repository identifier from remote URL: {0}")]
    UnrecognizedRemote(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Invalid bump type
    #[error("Invalid bump type: {0}")]
    InvalidBumpType(String),

    /// The bump did not move the version forward
    #[error("Version did not increase: {previous} -> {next}")]
    NotIncreased { previous: String, next: String },
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Tag missing or without a commit timestamp
    #[error("Tag not found or has no commit timestamp: {0}")]
    TagNotFound(String),

    /// Failed to write changelog
    #[error("Failed to write changelog {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Translation request failed
    #[error("Translation failed: {0}")]
    TranslationFailed(String),
}

/// Manifest-related errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Package manifest not found
    #[error("Package manifest not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse manifest
    #[error("Failed to parse manifest {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    /// Manifest lacks a required field or has the wrong shape
    #[error("Invalid manifest {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    /// Failed to update manifest
    #[error("Failed to update manifest {path}: {reason}")]
    UpdateError { path: PathBuf, reason: String },

    /// Glob matched nothing
    #[error("Pattern '{0}' matched no manifests")]
    NoMatches(String),

    /// Glob pattern is malformed
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    BadPattern { pattern: String, reason: String },
}

/// External command errors
#[derive(Debug, Error)]
pub enum CommandError {
    /// Program could not be spawned
    #[error("Failed to run {command}: {reason}")]
    SpawnFailed { command: String, reason: String },

    /// Program exited unsuccessfully
    #[error("Command failed: {command} (exit code {code:?})\n{stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Required program is not on PATH
    #[error("Required tool not found on PATH: {0}")]
    ToolMissing(String),
}

/// Workflow-related errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Guard check failed
    #[error("Guard check '{check}' failed: {reason}")]
    GuardFailed { check: String, reason: String },

    /// Step failed
    #[error("Release stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: Box<LaunchpadError>,
    },

    /// User cancelled
    #[error("Operation cancelled by user")]
    Cancelled,
}

impl LaunchpadError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error was raised before anything was mutated
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) | Self::Version(VersionError::InvalidBumpType(_)) => true,
            Self::Manifest(
                ManifestError::Invalid { .. }
                | ManifestError::NoMatches(_)
                | ManifestError::BadPattern { .. },
            ) => true,
            Self::Workflow(WorkflowError::StageFailed { source, .. }) => source.is_configuration(),
            _ => false,
        }
    }

    /// The error a failed stage was raised with, or `self`
    pub fn stage_cause(&self) -> &LaunchpadError {
        match self {
            Self::Workflow(WorkflowError::StageFailed { source, .. }) => source.stage_cause(),
            other => other,
        }
    }
}
