//! Manifest synchronization
//!
//! Sync targets are resolved and validated up front by [`SyncPlan::prepare`]
//! so a bad pattern or a manifest of the wrong shape is reported before the
//! release mutates anything. The rewrite functions then run against the
//! resolved paths.

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::{debug, info, instrument};

use launchpad_core::config::{split_list, ReleaseConfig, MANIFEST_FILE};
use launchpad_core::error::{ManifestError, Result};

use crate::manifest::PackageJson;

/// Manifest key a consumer sets to receive an exact version instead of a
/// caret range
pub const EXACT_MARKER: &str = "syncDepsExact";

/// Resolved sync targets for one release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Consumer manifests whose dependency on the package is rewritten
    pub deps: Vec<PathBuf>,
    /// Manifests whose `version` mirrors the package
    pub versions: Vec<PathBuf>,
    /// Satellite package directories, in listed order
    pub satellites: Vec<PathBuf>,
}

impl SyncPlan {
    /// Resolve and validate every sync target named in the config
    #[instrument(skip(config), fields(base = %base.display()))]
    pub fn prepare(base: &Path, config: &ReleaseConfig, package: &str) -> Result<Self> {
        let deps = resolve_manifests(base, &split_list(config.sync_deps.as_deref()))?;
        for path in &deps {
            let manifest = PackageJson::load(path)?;
            if !manifest.depends_on(package) {
                return Err(ManifestError::Invalid {
                    path: path.clone(),
                    reason: format!("does not depend on '{}'", package),
                }
                .into());
            }
        }

        let versions = resolve_manifests(base, &split_list(config.sync_versions.as_deref()))?;
        for path in &versions {
            PackageJson::load(path)?;
        }

        let mut satellites = Vec::new();
        for path in resolve_manifests(base, &split_list(config.sync_publishes.as_deref()))? {
            PackageJson::load(&path)?.require_name()?;
            if let Some(dir) = path.parent() {
                satellites.push(dir.to_path_buf());
            }
        }

        let plan = Self {
            deps,
            versions,
            satellites,
        };
        debug!(
            deps = plan.deps.len(),
            versions = plan.versions.len(),
            satellites = plan.satellites.len(),
            "resolved sync targets"
        );
        Ok(plan)
    }
}

/// Resolve patterns relative to `base` into manifest paths.
///
/// A match that is a directory stands for the manifest inside it. Matches
/// are sorted within each pattern; pattern order is kept and duplicates
/// dropped. A pattern that matches no manifest is an error.
pub fn resolve_manifests(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut manifests: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        // Only the user pattern is a glob; the base directory is literal
        let literal_base = Pattern::escape(&base.to_string_lossy());
        let full_pattern = Path::new(&literal_base).join(pattern).to_string_lossy().to_string();
        let entries = glob(&full_pattern).map_err(|e| ManifestError::BadPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut matched = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ManifestError::BadPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

            let manifest_path = if path.is_dir() {
                path.join(MANIFEST_FILE)
            } else {
                path
            };
            if manifest_path.is_file() {
                matched.push(manifest_path);
            }
        }

        if matched.is_empty() {
            return Err(ManifestError::NoMatches(pattern.clone()).into());
        }

        matched.sort();
        for path in matched {
            if !manifests.contains(&path) {
                manifests.push(path);
            }
        }
    }

    Ok(manifests)
}

/// Range written for a consumer of `version`
pub fn dependency_range(version: &str, exact: bool) -> String {
    if exact {
        version.to_string()
    } else {
        format!("^{}", version)
    }
}

/// Rewrite each consumer's dependency on `package` to the new version
#[instrument(skip(manifests), fields(count = manifests.len()))]
pub fn sync_deps(manifests: &[PathBuf], package: &str, version: &str) -> Result<()> {
    for path in manifests {
        let mut manifest = PackageJson::load(path)?;
        let range = dependency_range(version, manifest.flag(EXACT_MARKER));
        let sections = manifest.set_dependency(package, &range);
        manifest.save()?;
        info!(
            manifest = %path.display(),
            range = %range,
            sections = ?sections,
            "synced dependency"
        );
    }
    Ok(())
}

/// Overwrite the `version` field of each manifest
#[instrument(skip(manifests), fields(count = manifests.len()))]
pub fn sync_versions(manifests: &[PathBuf], version: &str) -> Result<()> {
    for path in manifests {
        write_version(path, version)?;
    }
    Ok(())
}

/// Write `version` into the manifest inside a satellite directory
pub fn write_satellite_version(dir: &Path, version: &str) -> Result<()> {
    write_version(&dir.join(MANIFEST_FILE), version)
}

fn write_version(path: &Path, version: &str) -> Result<()> {
    let mut manifest = PackageJson::load(path)?;
    manifest.set_version(version);
    manifest.save()?;
    info!(manifest = %path.display(), version, "synced version");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::LaunchpadError;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, rel: &str, content: &str) -> PathBuf {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("package.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            "consumers/b",
            r#"{"name": "b", "dependencies": {"lib": "^1.0.0"}}"#,
        );
        write_manifest(
            temp.path(),
            "consumers/a",
            r#"{"name": "a", "devDependencies": {"lib": "1.0.0"}, "syncDepsExact": true}"#,
        );
        write_manifest(temp.path(), "packages/x", r#"{"name": "x", "version": "1.0.0"}"#);
        write_manifest(temp.path(), "packages/y", r#"{"name": "y", "version": "1.0.0"}"#);
        temp
    }

    #[test]
    fn test_resolve_sorted_and_dirs() {
        let temp = fixture();
        let paths = resolve_manifests(temp.path(), &["consumers/*".to_string()]).unwrap();
        assert_eq!(
            paths,
            vec![
                temp.path().join("consumers/a/package.json"),
                temp.path().join("consumers/b/package.json"),
            ]
        );
    }

    #[test]
    fn test_resolve_keeps_pattern_order_and_dedups() {
        let temp = fixture();
        let patterns = vec![
            "packages/y".to_string(),
            "packages/*/package.json".to_string(),
        ];
        let paths = resolve_manifests(temp.path(), &patterns).unwrap();
        assert_eq!(
            paths,
            vec![
                temp.path().join("packages/y/package.json"),
                temp.path().join("packages/x/package.json"),
            ]
        );
    }

    #[test]
    fn test_resolve_under_glob_metacharacters() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("[work]").join("pkg*");
        write_manifest(&base, "consumers/a", r#"{"name": "a", "dependencies": {"lib": "1.0.0"}}"#);

        let paths = resolve_manifests(&base, &["consumers/*".to_string()]).unwrap();
        assert_eq!(paths, vec![base.join("consumers/a/package.json")]);
    }

    #[test]
    fn test_resolve_no_matches() {
        let temp = fixture();
        let err = resolve_manifests(temp.path(), &["missing/*".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            LaunchpadError::Manifest(ManifestError::NoMatches(_))
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolve_bad_pattern() {
        let temp = fixture();
        let err = resolve_manifests(temp.path(), &["packages/[".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            LaunchpadError::Manifest(ManifestError::BadPattern { .. })
        ));
    }

    #[test]
    fn test_prepare_rejects_non_consumer() {
        let temp = fixture();
        let config = ReleaseConfig {
            sync_deps: Some("packages/*".to_string()),
            ..Default::default()
        };
        let err = SyncPlan::prepare(temp.path(), &config, "lib").unwrap_err();
        assert!(err.to_string().contains("does not depend on 'lib'"));
    }

    #[test]
    fn test_prepare_full_plan() {
        let temp = fixture();
        let config = ReleaseConfig {
            sync_deps: Some("consumers/*".to_string()),
            sync_versions: Some("packages/x".to_string()),
            sync_publishes: Some("packages/y, packages/x".to_string()),
            ..Default::default()
        };
        let plan = SyncPlan::prepare(temp.path(), &config, "lib").unwrap();
        assert_eq!(plan.deps.len(), 2);
        assert_eq!(plan.versions, vec![temp.path().join("packages/x/package.json")]);
        assert_eq!(
            plan.satellites,
            vec![temp.path().join("packages/y"), temp.path().join("packages/x")]
        );
    }

    #[test]
    fn test_sync_deps_caret_and_exact() {
        let temp = fixture();
        let paths = resolve_manifests(temp.path(), &["consumers/*".to_string()]).unwrap();
        sync_deps(&paths, "lib", "2.0.0").unwrap();

        let a = PackageJson::load(&paths[0]).unwrap();
        assert_eq!(a.dependency("devDependencies", "lib"), Some("2.0.0"));
        let b = PackageJson::load(&paths[1]).unwrap();
        assert_eq!(b.dependency("dependencies", "lib"), Some("^2.0.0"));
    }

    #[test]
    fn test_sync_versions() {
        let temp = fixture();
        let paths = resolve_manifests(temp.path(), &["packages/*".to_string()]).unwrap();
        sync_versions(&paths, "1.1.0").unwrap();
        for path in paths {
            assert_eq!(PackageJson::load(&path).unwrap().version(), "1.1.0");
        }
    }

    #[test]
    fn test_write_satellite_version() {
        let temp = fixture();
        let dir = temp.path().join("packages/x");
        write_satellite_version(&dir, "3.0.0").unwrap();
        assert_eq!(PackageJson::load_dir(&dir).unwrap().version(), "3.0.0");
    }

    #[test]
    fn test_dependency_range() {
        assert_eq!(dependency_range("1.2.3", false), "^1.2.3");
        assert_eq!(dependency_range("1.2.3", true), "1.2.3");
    }
}
