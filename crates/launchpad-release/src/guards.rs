//! Pre-publish guard checks
//!
//! Every check here only reads state. A failure aborts the release before
//! the first mutation.

use tracing::{debug, info, instrument};

use launchpad_core::error::{Result, WorkflowError};
use launchpad_core::types::PublishClient;
use launchpad_git::GitRepo;
use launchpad_npm::{PackageJson, PackageManager};

/// The working tree must have no changes, untracked files included
pub fn check_git_status(git: &GitRepo) -> Result<()> {
    git.ensure_clean()?;
    debug!("git status is clean");
    Ok(())
}

/// A scoped package bound for the public registry must be published as
/// public, or npm rejects it as a paid private package
pub fn check_access(manifest: &PackageJson, publish_client: PublishClient) -> Result<()> {
    if !manifest.is_scoped()
        || !publish_client.targets_default_registry()
        || !manifest.uses_default_registry()
    {
        return Ok(());
    }

    match manifest.publish_access() {
        Some("public") => Ok(()),
        other => Err(WorkflowError::GuardFailed {
            check: "access".to_string(),
            reason: format!(
                "scoped package {} needs publishConfig.access = \"public\" (found {})",
                manifest.name(),
                other.map(|a| format!("\"{}\"", a)).unwrap_or_else(|| "nothing".to_string())
            ),
        }
        .into()),
    }
}

/// The logged-in registry user must be an owner of the package
#[instrument(skip(pm))]
pub fn check_ownership(pm: &PackageManager<'_>, package: &str) -> Result<()> {
    let user = pm.whoami()?;
    if user.is_empty() {
        return Err(WorkflowError::GuardFailed {
            check: "ownership".to_string(),
            reason: "not logged in to the registry".to_string(),
        }
        .into());
    }

    let owners = pm.owners(package)?;
    if !owners.iter().any(|o| *o == user) {
        return Err(WorkflowError::GuardFailed {
            check: "ownership".to_string(),
            reason: format!("{} is not an owner of {} (owners: {})", user, package, owners.join(", ")),
        }
        .into());
    }

    info!(user = %user, package, "ownership confirmed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::process::testing::RecordingRunner;
    use launchpad_core::CommandOutput;
    use std::path::Path;
    use tempfile::TempDir;

    fn manifest(content: &str) -> (TempDir, PackageJson) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        std::fs::write(&path, content).unwrap();
        let pkg = PackageJson::load(&path).unwrap();
        (temp, pkg)
    }

    #[test]
    fn test_access_scoped_requires_public() {
        let (_t, pkg) = manifest(r#"{"name": "@s/p", "version": "1.0.0"}"#);
        let err = check_access(&pkg, PublishClient::Npm).unwrap_err();
        assert!(err.to_string().contains("publishConfig.access"));

        let (_t, pkg) = manifest(
            r#"{"name": "@s/p", "version": "1.0.0", "publishConfig": {"access": "restricted"}}"#,
        );
        assert!(check_access(&pkg, PublishClient::Npm).is_err());

        let (_t, pkg) = manifest(
            r#"{"name": "@s/p", "version": "1.0.0", "publishConfig": {"access": "public"}}"#,
        );
        assert!(check_access(&pkg, PublishClient::Npm).is_ok());
    }

    #[test]
    fn test_access_unscoped_or_private_registry() {
        let (_t, pkg) = manifest(r#"{"name": "plain", "version": "1.0.0"}"#);
        assert!(check_access(&pkg, PublishClient::Npm).is_ok());

        let (_t, pkg) = manifest(r#"{"name": "@s/p", "version": "1.0.0"}"#);
        assert!(check_access(&pkg, PublishClient::Tnpm).is_ok());

        let (_t, pkg) = manifest(
            r#"{"name": "@s/p", "version": "1.0.0", "publishConfig": {"registry": "https://npm.corp.example"}}"#,
        );
        assert!(check_access(&pkg, PublishClient::Npm).is_ok());
    }

    #[test]
    fn test_ownership() {
        let runner = RecordingRunner::new()
            .respond("npm whoami", CommandOutput::ok("alice\n"))
            .respond("npm owner ls", CommandOutput::ok("alice <a@x.io>\n"));
        let pm = PackageManager::new(&runner, Path::new("."));
        assert!(check_ownership(&pm, "pkg").is_ok());
    }

    #[test]
    fn test_ownership_denied() {
        let runner = RecordingRunner::new()
            .respond("npm whoami", CommandOutput::ok("mallory\n"))
            .respond("npm owner ls", CommandOutput::ok("alice <a@x.io>\n"));
        let pm = PackageManager::new(&runner, Path::new("."));
        let err = check_ownership(&pm, "pkg").unwrap_err();
        assert!(err.to_string().contains("mallory is not an owner"));
    }

    #[test]
    fn test_ownership_not_logged_in() {
        let runner = RecordingRunner::new().respond("npm whoami", CommandOutput::failed(1, "ENEEDAUTH"));
        let pm = PackageManager::new(&runner, Path::new("."));
        assert!(check_ownership(&pm, "pkg").is_err());
    }
}
