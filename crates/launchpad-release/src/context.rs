//! Pipeline environment and repository snapshot

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use launchpad_core::error::Result;
use launchpad_core::types::GitTagStyle;
use launchpad_git::GitRepo;
use launchpad_npm::is_monorepo;

/// Process environment the pipeline runs in, passed explicitly
#[derive(Debug, Clone, Default)]
pub struct PipelineEnv {
    /// Package directory
    pub cwd: PathBuf,
    /// Credential for the translation API
    pub translation_key: Option<String>,
}

impl PipelineEnv {
    /// Create an environment rooted at a package directory
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            translation_key: None,
        }
    }

    /// Set the translation credential; blank keys count as absent
    pub fn with_translation_key(mut self, key: Option<String>) -> Self {
        self.translation_key = key.filter(|k| !k.trim().is_empty());
        self
    }
}

/// Read-only view of the repository, computed once at start
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoContext {
    /// Repository working directory
    pub root: PathBuf,
    /// Checked-out branch; `None` when detached
    pub branch: Option<String>,
    /// Whether the package lives in a pnpm workspace
    pub monorepo: bool,
    /// Most recent release tag reachable from HEAD
    pub latest_tag: Option<String>,
    /// `owner/name` of the remote repository
    pub repo_id: Option<String>,
}

impl RepoContext {
    /// Inspect the repository around a package
    pub fn inspect(
        git: &GitRepo,
        package_dir: &Path,
        package: &str,
        tag_style: GitTagStyle,
        remote: &str,
    ) -> Result<Self> {
        let branch = git.current_branch()?;
        let prefix = tag_prefix(tag_style, package);
        let latest_tag = git.latest_tag(prefix.as_deref())?.map(|t| t.name);

        let repo_id = match git.repo_id(remote) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(remote, error = %e, "could not derive repository identifier");
                None
            }
        };

        let context = Self {
            root: git.path().to_path_buf(),
            branch,
            monorepo: is_monorepo(package_dir),
            latest_tag,
            repo_id,
        };

        info!(
            branch = ?context.branch,
            monorepo = context.monorepo,
            latest_tag = ?context.latest_tag,
            repo_id = ?context.repo_id,
            "inspected repository"
        );
        Ok(context)
    }

    /// Path of `file` relative to the repository root, with `/` separators
    pub fn repo_relative(&self, file: &Path) -> String {
        let canonical = |p: &Path| p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
        let relative = match file.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            // Symlinked temp or home directories; the file may not exist yet
            Err(_) => {
                let dir = file.parent().map(canonical).unwrap_or_default();
                let full = file.file_name().map(|n| dir.join(n)).unwrap_or(dir);
                full.strip_prefix(canonical(&self.root))
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| file.to_path_buf())
            }
        };
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Prefix release tags of a package start with
pub fn tag_prefix(style: GitTagStyle, package: &str) -> Option<String> {
    match style {
        GitTagStyle::None => None,
        GitTagStyle::Prefixed => Some(format!("{}@", package)),
        GitTagStyle::V => Some("v".to_string()),
    }
}
