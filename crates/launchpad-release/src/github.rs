//! Hosted release creation through the `gh` CLI

use std::path::Path;

use tracing::{info, instrument};

use launchpad_core::error::Result;
use launchpad_core::process::{CommandRunner, CommandSpec};

/// Executable used to create releases
pub const GH: &str = "gh";

/// Anchor GitHub generates for a `## <version>` heading
pub fn changelog_anchor(version: &str) -> String {
    version
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_lowercase()
}

/// Links that make up a release body
#[derive(Debug, Clone)]
pub struct ReleaseNotes<'a> {
    pub repo_id: &'a str,
    pub branch: &'a str,
    /// Changelog path relative to the repository root
    pub changelog_path: &'a str,
    pub version: &'a str,
    pub previous_tag: Option<&'a str>,
    pub tag: &'a str,
}

impl ReleaseNotes<'_> {
    /// Render the release body
    pub fn render(&self) -> String {
        let mut body = format!(
            "See [CHANGELOG](https://github.com/{}/blob/{}/{}#{}) for details.",
            self.repo_id,
            self.branch,
            self.changelog_path,
            changelog_anchor(self.version)
        );
        if let Some(previous) = self.previous_tag {
            body.push_str(&format!(
                "\n\n**Full Changelog**: https://github.com/{}/compare/{}...{}",
                self.repo_id, previous, self.tag
            ));
        }
        body
    }
}

/// Create a release for an already-pushed tag
#[instrument(skip(runner, notes), fields(tag))]
pub fn create_release(
    runner: &dyn CommandRunner,
    cwd: &Path,
    tag: &str,
    notes: &str,
    prerelease: bool,
) -> Result<()> {
    let mut spec = CommandSpec::new(GH, cwd).args(["release", "create", tag, "--title", tag, "--notes", notes]);
    if prerelease {
        spec = spec.arg("--prerelease");
    }
    runner.run_checked(&spec)?;
    info!(tag, "created hosted release");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::process::testing::RecordingRunner;

    #[test]
    fn test_anchor() {
        assert_eq!(changelog_anchor("1.2.0"), "120");
        assert_eq!(changelog_anchor("2.0.0-beta.1"), "200-beta1");
    }

    #[test]
    fn test_notes_with_compare_link() {
        let notes = ReleaseNotes {
            repo_id: "o/r",
            branch: "main",
            changelog_path: "CHANGELOG.md",
            version: "1.1.0",
            previous_tag: Some("v1.0.0"),
            tag: "v1.1.0",
        };
        let body = notes.render();
        assert!(body.contains("https://github.com/o/r/blob/main/CHANGELOG.md#110"));
        assert!(body.contains("https://github.com/o/r/compare/v1.0.0...v1.1.0"));
    }

    #[test]
    fn test_notes_first_release() {
        let notes = ReleaseNotes {
            repo_id: "o/r",
            branch: "main",
            changelog_path: "packages/a/CHANGELOG.md",
            version: "0.1.0",
            previous_tag: None,
            tag: "a@0.1.0",
        };
        let body = notes.render();
        assert!(body.contains("blob/main/packages/a/CHANGELOG.md#010"));
        assert!(!body.contains("compare"));
    }

    #[test]
    fn test_create_release_command() {
        let runner = RecordingRunner::new();
        create_release(&runner, Path::new("."), "v1.0.0", "notes", true).unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["gh release create v1.0.0 --title v1.0.0 --notes notes --prerelease".to_string()]
        );
    }
}
