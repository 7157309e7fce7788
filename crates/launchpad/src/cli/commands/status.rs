//! Status command

use clap::Args;
use console::style;
use tracing::info;

use launchpad_core::config::load_config_or_default;
use launchpad_git::GitRepo;
use launchpad_npm::PackageJson;
use launchpad_release::RepoContext;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Show repository and package status
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing status command");
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;

        let manifest = PackageJson::load_dir(&cwd)?;
        let name = manifest.require_name()?.to_string();

        let repo = GitRepo::discover(&cwd)?;
        let context = RepoContext::inspect(&repo, &cwd, &name, config.git_tag, &config.remote)?;
        let dirty = repo.dirty_files()?;

        let commits_since = match &context.latest_tag {
            Some(tag) => match repo.tag_timestamp(tag)? {
                Some(since) => repo.commits_after(since)?.len(),
                None => 0,
            },
            None => 0,
        };

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "package": {
                        "name": name,
                        "version": manifest.version(),
                        "scoped": manifest.is_scoped(),
                        "access": manifest.publish_access(),
                    },
                    "repository": context,
                    "dirty_files": dirty,
                    "commits_since_tag": commits_since,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", output::header("Package"));
                println!("{}", output::key_value("Name", &name));
                println!(
                    "{}",
                    output::key_value("Version", &output::version_style().apply_to(manifest.version()).to_string())
                );
                println!(
                    "{}",
                    output::key_value(
                        "Config",
                        &config_path
                            .map(|p| output::path_style().apply_to(p.display()).to_string())
                            .unwrap_or_else(|| style("defaults").dim().to_string())
                    )
                );
                println!();

                println!("{}", output::header("Repository"));
                println!(
                    "{}",
                    output::key_value("Branch", context.branch.as_deref().unwrap_or("(detached)"))
                );
                let clean = if dirty.is_empty() {
                    style("clean").green()
                } else {
                    style("dirty").red()
                };
                println!("{}", output::key_value("Status", &clean.to_string()));
                println!(
                    "{}",
                    output::key_value(
                        "Latest tag",
                        &context
                            .latest_tag
                            .as_deref()
                            .map(|t| output::tag_style().apply_to(t).to_string())
                            .unwrap_or_else(|| style("none").dim().to_string())
                    )
                );
                println!("{}", output::key_value("Commits since", &commits_since.to_string()));
                println!("{}", output::key_value("Remote", context.repo_id.as_deref().unwrap_or("unknown")));
                println!("{}", output::key_value("Monorepo", if context.monorepo { "yes" } else { "no" }));
                println!();

                println!("{}", output::header("Release Readiness"));
                let mut issues = Vec::new();
                if config.check_git_status && !dirty.is_empty() {
                    issues.push(format!("Working directory has uncommitted changes: {}", dirty.join(", ")));
                }
                if context.branch.is_none() {
                    issues.push("HEAD is not on a branch".to_string());
                }
                if context.repo_id.is_none() && (config.changelog || config.github_release) {
                    issues.push(format!("Remote '{}' is not a recognizable repository", config.remote));
                }

                if issues.is_empty() {
                    println!("  {}", style("✓ Ready to release").green().bold());
                } else {
                    for issue in issues {
                        println!("  {} {}", style("✗").red(), issue);
                    }
                }
            }
        }

        Ok(())
    }
}
