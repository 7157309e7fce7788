//! Output formatting utilities

use console::{style, Style};

use launchpad_core::error::LaunchpadError;
use launchpad_release::{ReleaseReport, ReleaseReporter, Stage, StageOutcome};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().underlined().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {:<14} {}", style(format!("{}:", key)).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for tags
pub fn tag_style() -> Style {
    Style::new().yellow()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// One status line for a finished stage
pub fn stage_line(stage: Stage, outcome: &StageOutcome) -> String {
    let (marker, status) = match outcome {
        StageOutcome::Completed(_) => (style("✓").green().bold(), style("done").green()),
        StageOutcome::Skipped(_) => (style("-").dim(), style("skipped").dim()),
        StageOutcome::Rehearsed(_) => (style("~").yellow().bold(), style("dry run").yellow()),
    };
    format!(
        "{} {:<15} {:<8} {}",
        marker,
        stage.as_str(),
        status,
        outcome.detail()
    )
}

/// Status line for a failed stage, flagging whether changes may be left behind
pub fn failure_line(stage: Stage) -> String {
    let mut line = format!("{} {:<15} {}", style("✗").red().bold(), stage.as_str(), style("failed").red());
    if stage.mutates() {
        line.push_str(&format!(
            " {}",
            style("(not rolled back; earlier stages may have published, written or committed)").yellow()
        ));
    }
    line
}

/// Prints stage progress to the terminal as the pipeline runs
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    enabled: bool,
}

impl ConsoleReporter {
    /// Create a reporter; a disabled one prints nothing
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl ReleaseReporter for ConsoleReporter {
    fn stage_finished(&self, stage: Stage, outcome: &StageOutcome) {
        if self.enabled {
            println!("{}", stage_line(stage, outcome));
        }
    }

    fn stage_failed(&self, stage: Stage, _error: &LaunchpadError) {
        // Printed even when quiet: this is the trail of what already happened
        eprintln!("{}", failure_line(stage));
    }
}

/// Print the closing summary of a release
pub fn print_report(report: &ReleaseReport) {
    println!();
    println!("{}", header("Release"));
    println!("{}", key_value("Package", &report.package));
    println!(
        "{}",
        key_value(
            "Version",
            &format!(
                "{} -> {}",
                report.previous_version,
                version_style().apply_to(&report.version)
            )
        )
    );
    println!("{}", key_value("Dist tag", &report.dist_tag));
    if let Some(tag) = &report.tag {
        println!("{}", key_value("Git tag", &tag_style().apply_to(tag).to_string()));
    }
    println!();

    if report.dry_run {
        success(&format!(
            "Dry run complete. Version {} would be released.",
            version_style().apply_to(&report.version)
        ));
    } else {
        success(&format!(
            "Released {}@{}",
            report.package,
            version_style().apply_to(&report.version)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_line_contains_detail() {
        console::set_colors_enabled(false);
        let line = stage_line(Stage::Publish, &StageOutcome::Rehearsed("npm publish --tag latest".to_string()));
        assert!(line.starts_with("~ publish"));
        assert!(line.contains("dry run"));
        assert!(line.ends_with("npm publish --tag latest"));
    }

    #[test]
    fn test_failure_line_flags_partial_state() {
        console::set_colors_enabled(false);
        assert!(!failure_line(Stage::GuardChecks).contains("not rolled back"));
        let line = failure_line(Stage::Publish);
        assert!(line.starts_with("✗ publish"));
        assert!(line.contains("not rolled back"));
    }

    #[test]
    fn test_key_value() {
        console::set_colors_enabled(false);
        let line = key_value("Branch", "main");
        assert!(line.starts_with("  Branch:"));
        assert!(line.ends_with(" main"));
    }
}
