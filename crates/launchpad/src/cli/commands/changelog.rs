//! Changelog command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use launchpad_changelog::{prepend_changelog, ChangelogGenerator};
use launchpad_core::config::load_config_or_default;
use launchpad_git::GitRepo;
use launchpad_npm::PackageJson;
use launchpad_release::context::tag_prefix;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Derive the changelog block since the latest release tag
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Version heading for the block (default: the manifest version)
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,

    /// Tag to collect commits after (default: the latest release tag)
    #[arg(long, value_name = "TAG")]
    pub since: Option<String>,

    /// Prepend to the changelog file instead of printing
    #[arg(short, long)]
    pub write: bool,

    /// Output file (defaults to the configured changelog file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.for_version, since = ?self.since, write = self.write, "executing changelog command");
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd)?;

        let manifest = PackageJson::load_dir(&cwd)?;
        let name = manifest.require_name()?.to_string();
        let version = self
            .for_version
            .clone()
            .unwrap_or_else(|| manifest.version().to_string());

        let repo = GitRepo::discover(&cwd)?;
        let since = match &self.since {
            Some(tag) => tag.clone(),
            None => match repo.latest_tag(tag_prefix(config.git_tag, &name).as_deref())? {
                Some(tag) => tag.name,
                None => {
                    if cli.prints_text() {
                        output::warning("No release tag found; nothing to derive a changelog from.");
                    }
                    return Ok(());
                }
            },
        };
        let repo_id = repo.repo_id(&config.remote)?;

        let section = ChangelogGenerator::new(repo_id).since_tag(&repo, &since, &version)?;
        if section.is_empty() && cli.prints_text() {
            output::info(&format!("No changes since {}.", style(&since).yellow()));
        }

        if self.write {
            let output_path = self
                .output
                .clone()
                .unwrap_or_else(|| cwd.join(&config.changelog_file));
            prepend_changelog(&output_path, &section.render())?;

            if !cli.quiet {
                output::success(&format!(
                    "Changelog written to {}",
                    output::path_style().apply_to(output_path.display())
                ));
            }
            return Ok(());
        }

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&section)?),
            OutputFormat::Text => print!("{}", section),
        }

        Ok(())
    }
}
