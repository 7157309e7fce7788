//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::GitTagStyle;

use super::types::ReleaseConfig;

/// Validate configuration
pub fn validate_config(config: &ReleaseConfig) -> Result<()> {
    debug!("validating configuration");
    config.bump_mode()?;
    validate_git(config)?;
    validate_dist_tag(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_git(config: &ReleaseConfig) -> Result<()> {
    if config.remote.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "remote".to_string(),
            message: "remote cannot be empty".to_string(),
        }
        .into());
    }

    if config.github_release && config.git_tag == GitTagStyle::None {
        return Err(ConfigError::InvalidValue {
            field: "github_release".to_string(),
            message: "a release needs a tag; set git_tag to 'v' or 'prefixed'".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_dist_tag(config: &ReleaseConfig) -> Result<()> {
    if let Some(tag) = &config.dist_tag {
        // npm rejects tags that parse as semver ranges
        if semver::VersionReq::parse(tag).is_ok() && tag.chars().any(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "dist_tag".to_string(),
                message: format!("'{}' looks like a version range", tag),
            }
            .into());
        }
    }

    Ok(())
}
