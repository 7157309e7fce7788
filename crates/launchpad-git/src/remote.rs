//! Remote operations

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::repository::{GitRepo, Result};
use launchpad_core::error::GitError;

impl GitRepo {
    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<String> {
        match self.repo.find_remote(name) {
            Ok(remote) => remote
                .url()
                .map(|s| s.to_string())
                .ok_or_else(|| GitError::RemoteNotFound(name.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// `owner/name` identifier of the repository behind a remote
    pub fn repo_id(&self, remote: &str) -> Result<String> {
        let url = self.remote_url(remote)?;
        let id = parse_repo_id(&url).ok_or_else(|| GitError::UnrecognizedRemote(url.clone()))?;
        debug!(remote, url = %url, repo_id = %id, "resolved repository identifier");
        Ok(id)
    }
}

/// Trailing `owner/name(.git)` of a remote URL
static REMOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[:/]([^/:]+)/([^/]+?)(?:\.git)?/?$").expect("Invalid regex")
});

/// Derive `owner/name` from a remote URL.
///
/// Handles `git@host:owner/name.git`, `https://host/owner/name(.git)` and
/// `ssh://git@host/owner/name.git`.
pub fn parse_repo_id(url: &str) -> Option<String> {
    let caps = REMOTE_REGEX.captures(url.trim())?;
    let owner = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;

    #[test]
    fn test_parse_repo_id() {
        assert_eq!(
            parse_repo_id("git@github.com:umijs/tnf.git").as_deref(),
            Some("umijs/tnf")
        );
        assert_eq!(
            parse_repo_id("https://github.com/owner/repo").as_deref(),
            Some("owner/repo")
        );
        assert_eq!(
            parse_repo_id("https://github.com/owner/repo.git/").as_deref(),
            Some("owner/repo")
        );
        assert_eq!(
            parse_repo_id("ssh://git@github.com/owner/repo.git").as_deref(),
            Some("owner/repo")
        );
        assert_eq!(parse_repo_id("not a url"), None);
    }

    #[test]
    fn test_repo_id_from_remote() {
        let (temp, repo) = test_support::init();
        repo.remote("origin", "git@github.com:o/r.git").unwrap();

        let git = GitRepo::open(temp.path()).unwrap();
        assert_eq!(git.repo_id("origin").unwrap(), "o/r");
    }

    #[test]
    fn test_remote_not_found() {
        let (temp, _repo) = test_support::init();
        let git = GitRepo::open(temp.path()).unwrap();
        let result = git.remote_url("nonexistent");
        assert!(matches!(result, Err(GitError::RemoteNotFound(_))));
    }
}
