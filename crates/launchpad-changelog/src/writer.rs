//! Changelog file writing

use std::path::Path;

use tracing::{info, instrument};

use launchpad_core::error::{ChangelogError, Result};

/// Put `block` at the top of the changelog at `path`, creating the file if
/// it does not exist. Existing content follows after one blank line.
#[instrument(skip(block), fields(path = %path.display()))]
pub fn prepend_changelog(path: &Path, block: &str) -> Result<()> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ChangelogError::WriteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into())
        }
    };

    let block = format!("{}\n", block.trim_end());
    let content = if existing.trim().is_empty() {
        block
    } else {
        format!("{}\n{}", block, existing)
    };

    std::fs::write(path, content).map_err(|e| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!(path = %path.display(), "updated changelog");
    Ok(())
}
