//! External command execution
//!
//! Every subprocess the release pipeline spawns goes through a
//! [`CommandRunner`], so the pipeline can be driven against a fake in tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use crate::error::{CommandError, Result};

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// Create a new command in the given directory
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line as a single string, for logs and error messages
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Whether the process exited successfully
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout and stderr joined, for matching on tool messages
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Runs external programs
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its output. Only spawn failures are errors;
    /// a non-zero exit is reported through [`CommandOutput::success`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Whether a program can be found on PATH
    fn is_available(&self, program: &str) -> bool;

    /// Run a command and turn a non-zero exit into an error
    fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(spec)?;
        if output.success {
            Ok(output)
        } else {
            Err(CommandError::Failed {
                command: spec.display(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            }
            .into())
        }
    }
}

/// Runs commands with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(skip(self), fields(command = %spec))]
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .output()
            .map_err(|e| CommandError::SpawnFailed {
                command: spec.display(),
                reason: e.to_string(),
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!(
            command = %spec,
            success = result.success,
            duration_ms = start.elapsed().as_millis(),
            "command finished"
        );
        Ok(result)
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Test doubles for [`CommandRunner`]
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Records every command and answers from canned responses.
    ///
    /// Responses are matched by command-line prefix; the longest matching
    /// prefix wins. Unmatched commands succeed with empty output.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        calls: Mutex<Vec<CommandSpec>>,
        responses: Vec<(String, CommandOutput)>,
        missing: HashSet<String>,
    }

    impl RecordingRunner {
        /// Create a runner where every command succeeds
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer commands starting with `prefix` with `output`
        pub fn respond(mut self, prefix: impl Into<String>, output: CommandOutput) -> Self {
            self.responses.push((prefix.into(), output));
            self
        }

        /// Pretend a program is not installed
        pub fn without_tool(mut self, program: impl Into<String>) -> Self {
            self.missing.insert(program.into());
            self
        }

        /// All recorded command lines, in order
        pub fn command_lines(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|calls| calls.iter().map(CommandSpec::display).collect())
                .unwrap_or_default()
        }

        /// All recorded commands, in order
        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// Whether any recorded command line starts with `prefix`
        pub fn ran(&self, prefix: &str) -> bool {
            self.command_lines().iter().any(|c| c.starts_with(prefix))
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
            let line = spec.display();
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(spec.clone());
            }
            let output = self
                .responses
                .iter()
                .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, output)| output.clone())
                .unwrap_or_else(|| CommandOutput::ok(""));
            Ok(output)
        }

        fn is_available(&self, program: &str) -> bool {
            !self.missing.contains(program)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let spec = CommandSpec::new("git", Path::new("."))
            .args(["commit", "-m", "release: 1.0.0"]);
        assert_eq!(spec.display(), "git commit -m \"release: 1.0.0\"");
    }

    #[test]
    fn test_run_checked_surfaces_stderr() {
        let runner = RecordingRunner::new()
            .respond("npm publish", CommandOutput::failed(1, "E403 forbidden\n"));
        let spec = CommandSpec::new("npm", Path::new(".")).args(["publish", "--tag", "latest"]);

        let err = runner.run_checked(&spec).unwrap_err();
        assert!(err.to_string().contains("E403 forbidden"));
    }

    #[test]
    fn test_recording_runner_longest_prefix() {
        let runner = RecordingRunner::new()
            .respond("npm", CommandOutput::ok("generic"))
            .respond("npm whoami", CommandOutput::ok("alice"));

        let spec = CommandSpec::new("npm", Path::new(".")).arg("whoami");
        assert_eq!(runner.run(&spec).unwrap().stdout, "alice");
        assert!(runner.ran("npm whoami"));
    }

    #[test]
    fn test_system_runner_reports_exit_status() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner::new();
        if !runner.is_available("git") {
            return;
        }
        let spec = CommandSpec::new("git", temp.path()).arg("--version");
        let output = runner.run(&spec).unwrap();
        assert!(output.success);
        assert!(output.stdout.contains("git version"));
    }
}
