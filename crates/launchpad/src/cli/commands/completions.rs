//! Shell completions command

use std::io::{self, Write};

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::Cli;

/// Print a completion script for launchpad
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");
        write_script(self.shell, &mut io::stdout())
    }
}

fn write_script(shell: Shell, out: &mut dyn Write) -> anyhow::Result<()> {
    generate(shell, &mut Cli::command(), "launchpad", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_names_subcommands() {
        let mut buf = Vec::new();
        write_script(Shell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("release"));
        assert!(script.contains("changelog"));
    }

    #[test]
    fn test_shell_parsed_from_command_line() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["launchpad", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            crate::cli::Commands::Completions(CompletionsCommand { shell: Shell::Zsh })
        ));
    }
}
