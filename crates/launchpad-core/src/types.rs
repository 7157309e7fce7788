//! Core types for Launchpad

use serde::{Deserialize, Serialize};

/// Semantic version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    Patch,
}

impl ReleaseType {
    /// Returns the string representation of the release type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }

    /// Apply this bump to a version, dropping any pre-release or build metadata
    pub fn apply(&self, version: &semver::Version) -> semver::Version {
        match self {
            Self::Major => semver::Version::new(version.major + 1, 0, 0),
            Self::Minor => semver::Version::new(version.major, version.minor + 1, 0),
            Self::Patch if !version.pre.is_empty() => {
                // npm releases the pre-release itself on a patch bump
                semver::Version::new(version.major, version.minor, version.patch)
            }
            Self::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown release type: {}", s)),
        }
    }
}

/// How the version bump stage behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpMode {
    /// Delegate to the package manager's version command
    Release(ReleaseType),
    /// Ask the operator for an explicit version
    Prompt,
    /// Keep the current version
    Skip,
}

impl BumpMode {
    /// Parse a bump token. `question` is accepted as an alias of `prompt`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "prompt" | "question" => Some(Self::Prompt),
            other => other.parse::<ReleaseType>().ok().map(Self::Release),
        }
    }
}

impl std::fmt::Display for BumpMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Release(t) => write!(f, "{}", t),
            Self::Prompt => write!(f, "prompt"),
            Self::Skip => write!(f, "none"),
        }
    }
}

/// Package manager used for scripts, installs and version bumps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpmClient {
    Npm,
    #[default]
    Pnpm,
    Yarn,
    Bun,
}

impl NpmClient {
    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }
}

impl std::fmt::Display for NpmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

impl std::str::FromStr for NpmClient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            _ => Err(format!("Unknown npm client: {} (expected npm, pnpm, yarn or bun)", s)),
        }
    }
}

/// Client used to talk to the registry when publishing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishClient {
    #[default]
    Npm,
    Pnpm,
    Tnpm,
}

impl PublishClient {
    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Tnpm => "tnpm",
        }
    }

    /// Whether this client publishes to the public npm registry
    pub fn targets_default_registry(&self) -> bool {
        !matches!(self, Self::Tnpm)
    }
}

impl std::fmt::Display for PublishClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

impl std::str::FromStr for PublishClient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "tnpm" => Ok(Self::Tnpm),
            _ => Err(format!("Unknown publish client: {} (expected npm, pnpm or tnpm)", s)),
        }
    }
}

/// Git tag naming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitTagStyle {
    /// Do not tag
    None,
    /// `<name>@<version>`
    Prefixed,
    /// `v<version>`
    #[default]
    V,
}

impl GitTagStyle {
    /// Tag name for a release, or `None` when tagging is disabled
    pub fn tag_name(&self, package: &str, version: &str) -> Option<String> {
        match self {
            Self::None => None,
            Self::Prefixed => Some(format!("{}@{}", package, version)),
            Self::V => Some(format!("v{}", version)),
        }
    }
}

impl std::str::FromStr for GitTagStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "prefixed" => Ok(Self::Prefixed),
            "v" => Ok(Self::V),
            _ => Err(format!("Unknown git tag style: {} (expected none, prefixed or v)", s)),
        }
    }
}

/// Markers that route a version to the `next` distribution tag
const PRERELEASE_MARKERS: &[&str] = &["-alpha.", "-beta.", "-rc."];

/// Resolve the distribution tag for a version
pub fn resolve_dist_tag(explicit: Option<&str>, version: &str) -> String {
    match explicit {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ if PRERELEASE_MARKERS.iter().any(|m| version.contains(m)) => "next".to_string(),
        _ => "latest".to_string(),
    }
}
