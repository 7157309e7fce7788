//! npm package.json handling
//!
//! The manifest is kept as an ordered JSON document so that rewriting a
//! single field leaves every other field, and the field order, untouched.

use std::path::{Path, PathBuf};

use launchpad_core::error::{ManifestError, Result};
use serde_json::{Map, Value};

/// Dependency sections that may reference a sibling package
pub const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies"];

/// Default public registry
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// A loaded package.json
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl PackageJson {
    /// Load package.json from path
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::NotFound(path.to_path_buf()).into())
            }
            Err(e) => return Err(e.into()),
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| ManifestError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(doc) => Ok(Self {
                path: path.to_path_buf(),
                doc,
            }),
            _ => Err(ManifestError::Invalid {
                path: path.to_path_buf(),
                reason: "top level is not a JSON object".to_string(),
            }
            .into()),
        }
    }

    /// Load package.json from a package directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join("package.json"))
    }

    /// Save package.json back to where it was loaded from
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.doc).map_err(|e| {
            ManifestError::UpdateError {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        // Ensure trailing newline
        let content = format!("{}\n", content.trim_end());

        std::fs::write(&self.path, content).map_err(|e| {
            ManifestError::UpdateError {
                path: self.path.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Package name, empty when missing
    pub fn name(&self) -> &str {
        self.str_field("name").unwrap_or_default()
    }

    /// Package name, failing when missing or empty
    pub fn require_name(&self) -> Result<&str> {
        match self.str_field("name") {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ManifestError::Invalid {
                path: self.path.clone(),
                reason: "missing required field 'name'".to_string(),
            }
            .into()),
        }
    }

    /// Package version, empty when missing
    pub fn version(&self) -> &str {
        self.str_field("version").unwrap_or_default()
    }

    /// Package version parsed as semver
    pub fn semver(&self) -> Result<semver::Version> {
        semver::Version::parse(self.version()).map_err(|e| {
            ManifestError::Invalid {
                path: self.path.clone(),
                reason: format!("version '{}' is not valid semver: {}", self.version(), e),
            }
            .into()
        })
    }

    /// Whether `scripts.<name>` is declared
    pub fn has_script(&self, name: &str) -> bool {
        self.doc
            .get("scripts")
            .and_then(Value::as_object)
            .is_some_and(|scripts| scripts.contains_key(name))
    }

    /// `publishConfig.access`
    pub fn publish_access(&self) -> Option<&str> {
        self.publish_config_field("access")
    }

    /// `publishConfig.registry`
    pub fn publish_registry(&self) -> Option<&str> {
        self.publish_config_field("registry")
    }

    /// Whether the package name is scoped (`@scope/name`)
    pub fn is_scoped(&self) -> bool {
        self.name().starts_with('@')
    }

    /// Whether publishing goes to the public registry
    pub fn uses_default_registry(&self) -> bool {
        match self.publish_registry() {
            None => true,
            Some(url) => url.trim_end_matches('/') == DEFAULT_REGISTRY,
        }
    }

    /// Boolean top-level field, false when absent
    pub fn flag(&self, key: &str) -> bool {
        self.doc.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Version range this manifest declares for `package` in the given section
    pub fn dependency(&self, section: &str, package: &str) -> Option<&str> {
        self.doc
            .get(section)
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(package))
            .and_then(Value::as_str)
    }

    /// Whether any dependency section references `package`
    pub fn depends_on(&self, package: &str) -> bool {
        DEPENDENCY_SECTIONS
            .iter()
            .any(|section| self.dependency(section, package).is_some())
    }

    /// Set the version field
    pub fn set_version(&mut self, version: &str) {
        self.doc
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Rewrite every existing reference to `package`. Returns the sections
    /// that changed.
    pub fn set_dependency(&mut self, package: &str, range: &str) -> Vec<&'static str> {
        let mut changed = Vec::new();
        for section in DEPENDENCY_SECTIONS {
            if let Some(entry) = self
                .doc
                .get_mut(*section)
                .and_then(Value::as_object_mut)
                .and_then(|deps| deps.get_mut(package))
            {
                *entry = Value::String(range.to_string());
                changed.push(*section);
            }
        }
        changed
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.doc.get(key).and_then(Value::as_str)
    }

    fn publish_config_field(&self, key: &str) -> Option<&str> {
        self.doc
            .get("publishConfig")
            .and_then(Value::as_object)
            .and_then(|c| c.get(key))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::error::LaunchpadError;
    use tempfile::TempDir;

    fn write(temp: &TempDir, content: &str) -> PathBuf {
        let path = temp.path().join("package.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_minimal() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, r#"{"name": "test", "version": "1.0.0"}"#);

        let pkg = PackageJson::load(&path).unwrap();
        assert_eq!(pkg.name(), "test");
        assert_eq!(pkg.version(), "1.0.0");
        assert!(!pkg.is_scoped());
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, r#"{"version": "1.0.0"}"#);

        let pkg = PackageJson::load(&path).unwrap();
        assert!(pkg.require_name().is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = PackageJson::load_dir(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            LaunchpadError::Manifest(ManifestError::NotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be
        let path = temp.path().join("package.json");
        std::fs::create_dir(&path).unwrap();

        let err = PackageJson::load(&path).unwrap_err();
        assert!(matches!(err, LaunchpadError::Io(_)));
    }

    #[test]
    fn test_not_an_object() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "[1, 2]");
        assert!(PackageJson::load(&path).is_err());
    }

    #[test]
    fn test_scripts_and_publish_config() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            r#"{
                "name": "@scope/pkg",
                "version": "1.2.3",
                "scripts": {"build": "tsc", "doctor": "node doctor.js"},
                "publishConfig": {"access": "public"}
            }"#,
        );

        let pkg = PackageJson::load(&path).unwrap();
        assert!(pkg.is_scoped());
        assert!(pkg.has_script("build"));
        assert!(pkg.has_script("doctor"));
        assert!(!pkg.has_script("test"));
        assert_eq!(pkg.publish_access(), Some("public"));
        assert!(pkg.uses_default_registry());
    }

    #[test]
    fn test_custom_registry() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            r#"{"name": "@s/p", "version": "1.0.0", "publishConfig": {"registry": "https://npm.internal/"}}"#,
        );
        let pkg = PackageJson::load(&path).unwrap();
        assert!(!pkg.uses_default_registry());
    }

    #[test]
    fn test_save_preserves_order_and_fields() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            r#"{"name": "test", "version": "1.0.0", "customField": "value", "author": "x"}"#,
        );

        let mut pkg = PackageJson::load(&path).unwrap();
        pkg.set_version("2.0.0");
        pkg.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n"));
        let name_pos = content.find("\"name\"").unwrap();
        let version_pos = content.find("\"version\"").unwrap();
        let custom_pos = content.find("\"customField\"").unwrap();
        assert!(name_pos < version_pos && version_pos < custom_pos);
        assert_eq!(PackageJson::load(&path).unwrap().version(), "2.0.0");
    }

    #[test]
    fn test_set_dependency() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            r#"{
                "name": "consumer",
                "dependencies": {"lib": "^1.0.0", "other": "1.0.0"},
                "devDependencies": {"lib": "1.0.0"}
            }"#,
        );

        let mut pkg = PackageJson::load(&path).unwrap();
        assert!(pkg.depends_on("lib"));
        let changed = pkg.set_dependency("lib", "^2.0.0");
        assert_eq!(changed, vec!["dependencies", "devDependencies"]);
        assert_eq!(pkg.dependency("dependencies", "lib"), Some("^2.0.0"));
        assert_eq!(pkg.dependency("dependencies", "other"), Some("1.0.0"));
        assert!(pkg.set_dependency("missing", "1.0.0").is_empty());
    }
}
