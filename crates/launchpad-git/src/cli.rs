//! Mutating git operations through the `git` executable

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use launchpad_core::error::{CommandError, Result};
use launchpad_core::process::{CommandRunner, CommandSpec};

/// Messages git prints when a commit has nothing in it
const NOTHING_TO_COMMIT: &[&str] = &["nothing to commit", "nothing added to commit"];

/// Result of a commit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A commit was created
    Committed,
    /// The tree had no changes; no commit was created
    NothingToCommit,
}

/// Runs git subcommands in a working directory
pub struct GitCli<'a> {
    runner: &'a dyn CommandRunner,
    cwd: PathBuf,
}

impl<'a> GitCli<'a> {
    /// Create a git CLI bound to a directory
    pub fn new(runner: &'a dyn CommandRunner, cwd: &Path) -> Self {
        Self {
            runner,
            cwd: cwd.to_path_buf(),
        }
    }

    fn git(&self) -> CommandSpec {
        CommandSpec::new("git", &self.cwd)
    }

    /// Stage everything under the working directory
    #[instrument(skip(self))]
    pub fn add_all(&self) -> Result<()> {
        self.runner.run_checked(&self.git().args(["add", "./"]))?;
        Ok(())
    }

    /// Commit staged changes. An empty commit is reported, not raised.
    #[instrument(skip(self), fields(message, no_verify))]
    pub fn commit(&self, message: &str, no_verify: bool) -> Result<CommitOutcome> {
        let mut spec = self.git().args(["commit", "-m", message]);
        if no_verify {
            spec = spec.arg("-n");
        }

        let output = self.runner.run(&spec)?;
        if output.success {
            info!(message, "created commit");
            return Ok(CommitOutcome::Committed);
        }

        let combined = output.combined();
        if NOTHING_TO_COMMIT.iter().any(|m| combined.contains(m)) {
            warn!(message, "nothing to commit, continuing");
            return Ok(CommitOutcome::NothingToCommit);
        }

        Err(CommandError::Failed {
            command: spec.display(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        }
        .into())
    }

    /// Create a lightweight tag at HEAD
    #[instrument(skip(self), fields(name))]
    pub fn tag(&self, name: &str) -> Result<()> {
        self.runner.run_checked(&self.git().args(["tag", name]))?;
        info!(name, "created tag");
        Ok(())
    }

    /// Push a branch and all tags
    #[instrument(skip(self), fields(remote, branch))]
    pub fn push_with_tags(&self, remote: &str, branch: &str) -> Result<()> {
        let start = std::time::Instant::now();
        self.runner
            .run_checked(&self.git().args(["push", remote, branch, "--tags"]))?;
        info!(
            remote,
            branch,
            duration_ms = start.elapsed().as_millis(),
            "pushed branch and tags"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::process::testing::RecordingRunner;
    use launchpad_core::CommandOutput;

    #[test]
    fn test_commit_with_no_verify() {
        let runner = RecordingRunner::new();
        let git = GitCli::new(&runner, Path::new("."));

        let outcome = git.commit("release: 1.0.0", true).unwrap();
        assert_eq!(outcome, CommitOutcome::Committed);
        assert_eq!(
            runner.command_lines(),
            vec!["git commit -m \"release: 1.0.0\" -n".to_string()]
        );
    }

    #[test]
    fn test_nothing_to_commit_is_swallowed() {
        let runner = RecordingRunner::new().respond(
            "git commit",
            CommandOutput {
                code: Some(1),
                success: false,
                stdout: "On branch main\nnothing to commit, working tree clean\n".to_string(),
                stderr: String::new(),
            },
        );
        let git = GitCli::new(&runner, Path::new("."));

        assert_eq!(
            git.commit("release: 1.0.0", false).unwrap(),
            CommitOutcome::NothingToCommit
        );
    }

    #[test]
    fn test_other_commit_failures_are_fatal() {
        let runner = RecordingRunner::new()
            .respond("git commit", CommandOutput::failed(128, "fatal: unable to auto-detect email"));
        let git = GitCli::new(&runner, Path::new("."));

        assert!(git.commit("release: 1.0.0", false).is_err());
    }

    #[test]
    fn test_push_with_tags() {
        let runner = RecordingRunner::new();
        let git = GitCli::new(&runner, Path::new("."));

        git.add_all().unwrap();
        git.tag("v1.0.0").unwrap();
        git.push_with_tags("origin", "main").unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "git add ./".to_string(),
                "git tag v1.0.0".to_string(),
                "git push origin main --tags".to_string(),
            ]
        );
    }

    #[test]
    fn test_push_rejection_is_fatal() {
        let runner = RecordingRunner::new()
            .respond("git push", CommandOutput::failed(1, "! [rejected] main -> main (fetch first)"));
        let git = GitCli::new(&runner, Path::new("."));

        let err = git.push_with_tags("origin", "main").unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
