//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit as seen by the changelog: subject line and author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit subject (first line)
    pub subject: String,
    /// Author handle
    pub author: String,
}

impl CommitRecord {
    /// Create a new record
    pub fn new(subject: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            author: author.into(),
        }
    }

    /// Render as a raw changelog line: `- <subject> by @<author>`
    pub fn to_log_line(&self) -> String {
        format!("- {} by @{}", self.subject, self.author)
    }
}

/// Information about a git tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Timestamp of the tagged commit
    pub timestamp: Option<DateTime<Utc>>,
    /// Extracted version from tag name
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        let version = extract_version(&name);

        Self {
            name,
            commit_hash: commit_hash.into(),
            timestamp: None,
            version,
        }
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Extract version from a tag name
fn extract_version(tag: &str) -> Option<String> {
    // v1.0.0, 1.0.0, package@1.0.0, @scope/package@1.0.0
    if let Some(pos) = tag.rfind('@').filter(|&p| p > 0) {
        let version_part = &tag[pos + 1..];
        let version = version_part.strip_prefix('v').unwrap_or(version_part);
        if semver::Version::parse(version).is_ok() {
            return Some(version.to_string());
        }
    }

    let bare = tag.strip_prefix('v').unwrap_or(tag);
    semver::Version::parse(bare).ok().map(|_| bare.to_string())
}
