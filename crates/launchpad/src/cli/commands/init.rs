//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use launchpad_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};
use launchpad_core::config::{load_config, ReleaseConfig};

use crate::cli::{output, Cli};

/// Write a starter launchpad.toml
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Never prompt; fail if the file exists and --force is not given
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_TOML));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                output::warning("Aborted.");
                return Ok(());
            }
        }

        write_config(&config_path)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to customize your release", config_path.display());
            println!("  2. Run {} to check the repository", style("launchpad status").cyan());
            println!("  3. Run {} to rehearse a release", style("launchpad release --dry-run").cyan());
        }

        Ok(())
    }
}

/// Write the template and read it back through the normal loader
fn write_config(path: &Path) -> anyhow::Result<ReleaseConfig> {
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(load_config(path)?)
}
