//! Changelog types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One version's block of changelog entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSection {
    /// Version heading
    pub version: String,
    /// Release date (UTC)
    pub date: NaiveDate,
    /// Rewritten entry lines, newest first
    pub entries: Vec<String>,
}

impl ChangelogSection {
    /// Create a section with no entries
    pub fn new(version: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            version: version.into(),
            date,
            entries: Vec::new(),
        }
    }

    /// Set the entries
    pub fn with_entries(mut self, entries: Vec<String>) -> Self {
        self.entries = entries;
        self
    }

    /// Whether the section has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as Markdown with exactly one trailing newline
    pub fn render(&self) -> String {
        let header = format!(
            "## {}\n\n`{}`\n",
            self.version,
            self.date.format("%Y-%m-%d")
        );
        let block = format!("{}\n{}", header, self.entries.join("\n"));
        format!("{}\n", block.trim_end())
    }
}

impl std::fmt::Display for ChangelogSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
