//! Release command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Input;
use tracing::info;

use launchpad_core::config::{load_config_or_default, BumpSetting, ReleaseConfig, TRANSLATION_KEY_ENV};
use launchpad_core::error::{LaunchpadError, Result};
use launchpad_core::types::{GitTagStyle, NpmClient, PublishClient};
use launchpad_core::SystemRunner;
use launchpad_release::{PipelineEnv, ReleasePipeline, VersionPrompt};

use crate::cli::output::{self, ConsoleReporter};
use crate::cli::{Cli, OutputFormat};

/// Build, publish, tag and push a release of the current package
#[derive(Debug, Default, Args)]
pub struct ReleaseCommand {
    /// Version bump: patch, minor, major, prompt, or false to keep the version
    #[arg(short, long, value_name = "BUMP")]
    pub bump: Option<String>,

    /// Dry run - log every mutation instead of performing it
    #[arg(long)]
    pub dry_run: bool,

    /// Distribution tag to publish under (default: latest, or next for prereleases)
    #[arg(long, value_name = "TAG")]
    pub dist_tag: Option<String>,

    /// Git tag naming: v, prefixed or none
    #[arg(long, value_name = "STYLE")]
    pub git_tag: Option<GitTagStyle>,

    /// Package manager for scripts and installs
    #[arg(long, value_name = "CLIENT")]
    pub npm_client: Option<NpmClient>,

    /// Client that publishes to the registry
    #[arg(long, value_name = "CLIENT")]
    pub publish_client: Option<PublishClient>,

    /// Skip the build and doctor scripts
    #[arg(long)]
    pub no_build: bool,

    /// Skip changelog generation
    #[arg(long)]
    pub no_changelog: bool,

    /// Allow uncommitted changes
    #[arg(long)]
    pub no_git_check: bool,

    /// Require the registry user to own the package
    #[arg(long)]
    pub check_ownership: bool,

    /// Create a hosted release with `gh`
    #[arg(long)]
    pub github_release: bool,

    /// Run git commit hooks on the release commit
    #[arg(long)]
    pub verify: bool,

    /// Comma-separated globs of consumer manifests to point at the new version
    #[arg(long, value_name = "GLOBS")]
    pub sync_deps: Option<String>,

    /// Comma-separated globs of manifests whose version mirrors this package
    #[arg(long, value_name = "GLOBS")]
    pub sync_versions: Option<String>,

    /// Comma-separated satellite package directories to publish alongside
    #[arg(long, value_name = "DIRS")]
    pub sync_publishes: Option<String>,

    /// Git remote to push to
    #[arg(long)]
    pub remote: Option<String>,

    /// Changelog file, relative to the package directory
    #[arg(long, value_name = "FILE")]
    pub changelog_file: Option<PathBuf>,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            bump = ?self.bump,
            dry_run = self.dry_run,
            dist_tag = ?self.dist_tag,
            "executing release command"
        );
        let cwd = std::env::current_dir()?;
        let (mut config, config_path) = load_config_or_default(&cwd)?;
        self.apply_overrides(&mut config);

        if config_path.is_none() && cli.prints_text() {
            output::warning(&format!(
                "No configuration found, using defaults. Run {} to create one.",
                style("launchpad init").cyan()
            ));
        }
        if config.dry_run && cli.prints_text() {
            println!("{}", style("[DRY RUN - no changes will be made]").yellow().bold());
            println!();
        }

        let env = PipelineEnv::new(&cwd).with_translation_key(std::env::var(TRANSLATION_KEY_ENV).ok());
        let runner = SystemRunner::new();
        let reporter = ConsoleReporter::new(cli.prints_text());
        let prompt = TerminalPrompt;

        let mut pipeline = ReleasePipeline::new(&config, &env, &runner).with_reporter(&reporter);
        if console::user_attended() {
            pipeline = pipeline.with_prompt(&prompt);
        }
        let report = pipeline.run()?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                if !cli.quiet {
                    output::print_report(&report);
                }
            }
        }

        Ok(())
    }

    /// Layer command-line flags over the loaded configuration
    pub fn apply_overrides(&self, config: &mut ReleaseConfig) {
        if let Some(bump) = &self.bump {
            config.bump = parse_bump(bump);
        }
        if let Some(dist_tag) = &self.dist_tag {
            config.dist_tag = Some(dist_tag.clone());
        }
        if let Some(style) = self.git_tag {
            config.git_tag = style;
        }
        if let Some(client) = self.npm_client {
            config.npm_client = client;
        }
        if let Some(client) = self.publish_client {
            config.publish_client = client;
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if let Some(file) = &self.changelog_file {
            config.changelog_file = file.clone();
        }
        for (target, value) in [
            (&mut config.sync_deps, &self.sync_deps),
            (&mut config.sync_versions, &self.sync_versions),
            (&mut config.sync_publishes, &self.sync_publishes),
        ] {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        config.dry_run |= self.dry_run;
        config.check_ownership |= self.check_ownership;
        config.github_release |= self.github_release;
        if self.no_build {
            config.build = false;
        }
        if self.no_changelog {
            config.changelog = false;
        }
        if self.no_git_check {
            config.check_git_status = false;
        }
        if self.verify {
            config.no_verify = false;
        }
    }
}

/// `true`/`false` toggle bumping; anything else is a bump token
fn parse_bump(value: &str) -> BumpSetting {
    match value.trim() {
        "false" => BumpSetting::Enabled(false),
        "true" => BumpSetting::Enabled(true),
        token => BumpSetting::Token(token.to_string()),
    }
}

/// Asks for the release version on the terminal
struct TerminalPrompt;

impl VersionPrompt for TerminalPrompt {
    fn ask_version(&self, current: &semver::Version) -> Result<String> {
        Input::<String>::new()
            .with_prompt(format!("Version to release (current {})", current))
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                semver::Version::parse(input.trim())
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(|e| LaunchpadError::other(format!("version prompt failed: {}", e)))
    }
}
