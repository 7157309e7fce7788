//! Changelog generation

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

use launchpad_core::error::{ChangelogError, Result};
use launchpad_git::{CommitRecord, GitRepo};

use crate::filter::filter_logs;
use crate::types::ChangelogSection;

/// Builds changelog sections for one repository
pub struct ChangelogGenerator {
    repo_id: String,
}

impl ChangelogGenerator {
    /// Create a generator linking pull requests to `repo_id` (`owner/name`)
    pub fn new(repo_id: impl Into<String>) -> Self {
        Self {
            repo_id: repo_id.into(),
        }
    }

    /// Build a section from commits, newest first
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn generate(
        &self,
        version: &str,
        date: NaiveDate,
        commits: &[CommitRecord],
    ) -> ChangelogSection {
        let lines: Vec<String> = commits.iter().map(CommitRecord::to_log_line).collect();
        let entries = filter_logs(&lines, &self.repo_id);
        info!(
            version,
            commit_count = commits.len(),
            entry_count = entries.len(),
            "generated changelog section"
        );
        ChangelogSection::new(version, date).with_entries(entries)
    }

    /// Collect commits since a tag and build the section for `new_version`
    pub fn since_tag(
        &self,
        repo: &GitRepo,
        since_tag: &str,
        new_version: &str,
    ) -> Result<ChangelogSection> {
        let since = repo
            .tag_timestamp(since_tag)?
            .ok_or_else(|| ChangelogError::TagNotFound(since_tag.to_string()))?;
        let commits = repo.commits_after(since)?;
        Ok(self.generate(new_version, Utc::now().date_naive(), &commits))
    }
}

/// Derive the Markdown block for `new_version` from commits after `since_tag`
pub fn derive_changelog(
    repo: &GitRepo,
    since_tag: &str,
    new_version: &str,
    repo_id: &str,
) -> Result<String> {
    let section = ChangelogGenerator::new(repo_id).since_tag(repo, since_tag, new_version)?;
    Ok(section.render())
}
