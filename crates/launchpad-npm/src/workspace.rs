//! Monorepo detection

use std::path::Path;

use launchpad_core::config::defaults::WORKSPACE_MARKER;

/// How many ancestors above the package directory are searched
const MAX_ANCESTORS: usize = 2;

/// Whether the package lives inside a pnpm workspace
pub fn is_monorepo(package_dir: &Path) -> bool {
    package_dir
        .ancestors()
        .take(MAX_ANCESTORS + 1)
        .any(|dir| dir.join(WORKSPACE_MARKER).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_in_package_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(WORKSPACE_MARKER), "packages:\n  - packages/*\n").unwrap();
        assert!(is_monorepo(temp.path()));
    }

    #[test]
    fn test_marker_two_levels_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(WORKSPACE_MARKER), "").unwrap();
        let pkg = temp.path().join("packages").join("core");
        std::fs::create_dir_all(&pkg).unwrap();
        assert!(is_monorepo(&pkg));
    }

    #[test]
    fn test_marker_too_far_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(WORKSPACE_MARKER), "").unwrap();
        let pkg = temp.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&pkg).unwrap();
        assert!(!is_monorepo(&pkg));
    }

    #[test]
    fn test_no_marker() {
        let temp = TempDir::new().unwrap();
        assert!(!is_monorepo(temp.path()));
    }
}
