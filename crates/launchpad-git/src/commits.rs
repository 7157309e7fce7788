//! Commit history operations

use chrono::{DateTime, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::CommitRecord;

impl GitRepo {
    /// Commits reachable from HEAD committed strictly after `since`, newest first
    ///
    /// Uses committer time, the same clock tag timestamps are read from, so
    /// rebased or cherry-picked commits land on the right side of the tag.
    #[instrument(skip(self), fields(since = %since))]
    pub fn commits_after(&self, since: DateTime<Utc>) -> Result<Vec<CommitRecord>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(head.id())?;

        let mut commits = Vec::new();

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.time().seconds() <= since.timestamp() {
                continue;
            }
            commits.push(commit_to_record(&commit));
        }

        debug!(count = commits.len(), "collected commits");
        Ok(commits)
    }
}

/// Convert a git2 Commit to a CommitRecord
fn commit_to_record(commit: &git2::Commit<'_>) -> CommitRecord {
    let subject = commit.summary().unwrap_or("(no message)").to_string();
    let author = commit.author();
    let handle = author.name().unwrap_or("unknown").to_string();

    CommitRecord::new(subject, handle)
}
