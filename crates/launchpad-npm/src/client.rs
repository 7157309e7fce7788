//! Package-manager and registry client

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use launchpad_core::error::Result;
use launchpad_core::process::{CommandRunner, CommandSpec};
use launchpad_core::types::{NpmClient, PublishClient, ReleaseType};

/// Drives the npm-family executables for one package directory
pub struct PackageManager<'a> {
    runner: &'a dyn CommandRunner,
    npm_client: NpmClient,
    publish_client: PublishClient,
    cwd: PathBuf,
}

impl<'a> PackageManager<'a> {
    /// Create a client for the package in `cwd`
    pub fn new(runner: &'a dyn CommandRunner, cwd: &Path) -> Self {
        Self {
            runner,
            npm_client: NpmClient::default(),
            publish_client: PublishClient::default(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Set the package manager used for scripts and installs
    pub fn with_npm_client(mut self, client: NpmClient) -> Self {
        self.npm_client = client;
        self
    }

    /// Set the client used for registry operations
    pub fn with_publish_client(mut self, client: PublishClient) -> Self {
        self.publish_client = client;
        self
    }

    /// Run a package script
    #[instrument(skip(self), fields(client = %self.npm_client))]
    pub fn run_script(&self, script: &str) -> Result<()> {
        let start = std::time::Instant::now();
        let spec = CommandSpec::new(self.npm_client.program(), &self.cwd).args(["run", script]);
        self.runner.run_checked(&spec)?;
        info!(
            script,
            duration_ms = start.elapsed().as_millis(),
            "script finished"
        );
        Ok(())
    }

    /// Refresh the lockfile after a version change
    #[instrument(skip(self), fields(client = %self.npm_client))]
    pub fn install(&self) -> Result<()> {
        let spec = CommandSpec::new(self.npm_client.program(), &self.cwd).arg("install");
        self.runner.run_checked(&spec)?;
        Ok(())
    }

    /// Bump the manifest version without creating a commit or tag
    #[instrument(skip(self))]
    pub fn version(&self, release_type: ReleaseType) -> Result<()> {
        let spec = CommandSpec::new("npm", &self.cwd).args([
            "version",
            release_type.as_str(),
            "--no-git-tag-version",
        ]);
        self.runner.run_checked(&spec)?;
        Ok(())
    }

    /// Publish the package in `dir` under a distribution tag
    #[instrument(skip(self), fields(client = %self.publish_client, dir = %dir.display()))]
    pub fn publish(&self, dir: &Path, dist_tag: &str) -> Result<()> {
        let start = std::time::Instant::now();
        let mut spec = CommandSpec::new(self.publish_client.program(), dir)
            .args(["publish", "--tag", dist_tag]);

        // pnpm refuses to publish from a tree the release itself just dirtied
        if self.publish_client == PublishClient::Pnpm {
            spec = spec.arg("--no-git-checks");
        }

        self.runner.run_checked(&spec)?;
        info!(
            dist_tag,
            duration_ms = start.elapsed().as_millis(),
            "published"
        );
        Ok(())
    }

    /// The identity the registry client is logged in as
    #[instrument(skip(self))]
    pub fn whoami(&self) -> Result<String> {
        let spec = CommandSpec::new(self.publish_client.program(), &self.cwd).arg("whoami");
        let output = self.runner.run_checked(&spec)?;
        Ok(output.stdout.trim().to_string())
    }

    /// Owners of a package on the registry
    #[instrument(skip(self))]
    pub fn owners(&self, package: &str) -> Result<Vec<String>> {
        let spec =
            CommandSpec::new(self.publish_client.program(), &self.cwd).args(["owner", "ls", package]);
        let output = self.runner.run_checked(&spec)?;
        let owners = parse_owner_list(&output.stdout);
        debug!(package, count = owners.len(), "resolved owners");
        Ok(owners)
    }
}

/// Parse `npm owner ls` output (`name <email>` per line) into names
pub fn parse_owner_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::process::testing::RecordingRunner;
    use launchpad_core::CommandOutput;

    #[test]
    fn test_version_command() {
        let runner = RecordingRunner::new();
        let pm = PackageManager::new(&runner, Path::new("."));
        pm.version(ReleaseType::Minor).unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["npm version minor --no-git-tag-version".to_string()]
        );
    }

    #[test]
    fn test_scripts_use_npm_client() {
        let runner = RecordingRunner::new();
        let pm = PackageManager::new(&runner, Path::new(".")).with_npm_client(NpmClient::Yarn);
        pm.run_script("build").unwrap();
        pm.install().unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["yarn run build".to_string(), "yarn install".to_string()]
        );
    }

    #[test]
    fn test_publish_uses_publish_client() {
        let runner = RecordingRunner::new();
        let pm = PackageManager::new(&runner, Path::new("."))
            .with_npm_client(NpmClient::Pnpm)
            .with_publish_client(PublishClient::Tnpm);
        pm.publish(Path::new("packages/a"), "next").unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].display(), "tnpm publish --tag next");
        assert_eq!(calls[0].cwd, PathBuf::from("packages/a"));
    }

    #[test]
    fn test_pnpm_publish_skips_git_checks() {
        let runner = RecordingRunner::new();
        let pm = PackageManager::new(&runner, Path::new("."))
            .with_publish_client(PublishClient::Pnpm);
        pm.publish(Path::new("."), "latest").unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["pnpm publish --tag latest --no-git-checks".to_string()]
        );
    }

    #[test]
    fn test_publish_failure_carries_stderr() {
        let runner = RecordingRunner::new().respond(
            "npm publish",
            CommandOutput::failed(1, "npm ERR! 403 You cannot publish over the previously published versions"),
        );
        let pm = PackageManager::new(&runner, Path::new("."));
        let err = pm.publish(Path::new("."), "latest").unwrap_err();
        assert!(err.to_string().contains("previously published"));
    }

    #[test]
    fn test_owners() {
        let runner = RecordingRunner::new()
            .respond("npm whoami", CommandOutput::ok("alice\n"))
            .respond(
                "npm owner ls",
                CommandOutput::ok("alice <alice@example.com>\nbob <bob@example.com>\n"),
            );
        let pm = PackageManager::new(&runner, Path::new("."));
        assert_eq!(pm.whoami().unwrap(), "alice");
        assert_eq!(pm.owners("pkg").unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_parse_owner_list_ignores_blank_lines() {
        assert_eq!(parse_owner_list("\n  carol <c@x.io>\n\n"), vec!["carol"]);
        assert!(parse_owner_list("").is_empty());
    }
}
