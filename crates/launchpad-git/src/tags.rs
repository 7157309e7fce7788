//! Tag operations

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// Get all tags, peeled to the commits they point at
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            if let Some(info) = self.find_tag(name)? {
                tags.push(info);
            }
        }

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Find a specific tag by name
    pub fn find_tag(&self, name: &str) -> Result<Option<TagInfo>> {
        let tag_ref = format!("refs/tags/{}", name);

        match self.repo.find_reference(&tag_ref) {
            Ok(reference) => {
                let commit = match reference.peel_to_commit() {
                    Ok(commit) => commit,
                    // Tags on trees or blobs carry no commit time
                    Err(_) => return Ok(None),
                };
                let info = TagInfo::new(name, commit.id().to_string());
                Ok(Some(match commit_time(&commit) {
                    Some(ts) => info.with_timestamp(ts),
                    None => info,
                }))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Commit timestamp of a tag, if the tag exists and points at a commit
    pub fn tag_timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.find_tag(name)?.and_then(|t| t.timestamp))
    }

    /// The nearest tag reachable from HEAD, like `git describe --tags --abbrev=0`.
    ///
    /// With a prefix only tags starting with it are considered. When several
    /// tags share the nearest commit, the highest version wins.
    #[instrument(skip(self), fields(prefix))]
    pub fn latest_tag(&self, prefix: Option<&str>) -> Result<Option<TagInfo>> {
        let mut by_commit: HashMap<String, Vec<TagInfo>> = HashMap::new();
        for tag in self.tags()? {
            if prefix.is_some_and(|p| !tag.name.starts_with(p)) {
                continue;
            }
            by_commit.entry(tag.commit_hash.clone()).or_default().push(tag);
        }

        if by_commit.is_empty() {
            debug!("no candidate tags");
            return Ok(None);
        }

        let head = match self.head_commit() {
            Ok(head) => head,
            Err(_) => return Ok(None),
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        for oid in revwalk {
            let oid = oid?;
            if let Some(mut candidates) = by_commit.remove(&oid.to_string()) {
                candidates.sort_by(|a, b| {
                    let va = a.version.as_deref().and_then(|v| semver::Version::parse(v).ok());
                    let vb = b.version.as_deref().and_then(|v| semver::Version::parse(v).ok());
                    vb.cmp(&va).then_with(|| b.name.cmp(&a.name))
                });
                let latest = candidates.into_iter().next();
                debug!(latest = ?latest.as_ref().map(|t| &t.name), "found latest tag");
                return Ok(latest);
            }
        }

        Ok(None)
    }
}

fn commit_time(commit: &git2::Commit<'_>) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(commit.time().seconds(), 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;

    #[test]
    fn test_list_tags() {
        let (temp, repo) = test_support::init();
        let oid = test_support::commit(&repo, "a.txt", "Initial commit", "Test", 1_700_000_000);
        test_support::tag(&repo, "v1.0.0", oid);

        let git = GitRepo::open(temp.path()).unwrap();
        let tags = git.tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
        assert_eq!(tags[0].version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_tag_timestamp() {
        let (temp, repo) = test_support::init();
        let oid = test_support::commit(&repo, "a.txt", "Initial commit", "Test", 1_700_000_000);
        test_support::tag(&repo, "v1.0.0", oid);

        let git = GitRepo::open(temp.path()).unwrap();
        let ts = git.tag_timestamp("v1.0.0").unwrap().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(git.tag_timestamp("v9.9.9").unwrap(), None);
    }

    #[test]
    fn test_latest_tag_is_nearest() {
        let (temp, repo) = test_support::init();
        let first = test_support::commit(&repo, "a.txt", "one", "Test", 1_700_000_000);
        test_support::tag(&repo, "v1.0.0", first);
        let second = test_support::commit(&repo, "b.txt", "two", "Test", 1_700_000_100);
        test_support::tag(&repo, "v1.1.0", second);
        test_support::commit(&repo, "c.txt", "three", "Test", 1_700_000_200);

        let git = GitRepo::open(temp.path()).unwrap();
        let latest = git.latest_tag(None).unwrap().unwrap();
        assert_eq!(latest.name, "v1.1.0");
    }

    #[test]
    fn test_latest_tag_with_prefix() {
        let (temp, repo) = test_support::init();
        let first = test_support::commit(&repo, "a.txt", "one", "Test", 1_700_000_000);
        test_support::tag(&repo, "pkg-a@1.0.0", first);
        let second = test_support::commit(&repo, "b.txt", "two", "Test", 1_700_000_100);
        test_support::tag(&repo, "pkg-b@3.0.0", second);

        let git = GitRepo::open(temp.path()).unwrap();
        let latest = git.latest_tag(Some("pkg-a@")).unwrap().unwrap();
        assert_eq!(latest.name, "pkg-a@1.0.0");
    }

    #[test]
    fn test_no_tags() {
        let (temp, repo) = test_support::init();
        test_support::commit(&repo, "a.txt", "one", "Test", 1_700_000_000);

        let git = GitRepo::open(temp.path()).unwrap();
        assert!(git.latest_tag(None).unwrap().is_none());
    }
}
