//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "launchpad.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "launchpad.yaml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".launchpad.yaml";

/// Manifest file name
pub const MANIFEST_FILE: &str = "package.json";

/// Monorepo workspace marker
pub const WORKSPACE_MARKER: &str = "pnpm-workspace.yaml";

/// Default changelog file
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Default translated changelog file
pub const DEFAULT_TRANSLATED_CHANGELOG_FILE: &str = "CHANGELOG.zh-CN.md";

/// Environment variable carrying the translation API credential
pub const TRANSLATION_KEY_ENV: &str = "GEMINI_API_KEY";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ALT_CONFIG_FILE,
        ".launchpad.toml",
    ]
}

/// Configuration template written by documentation and examples
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Launchpad configuration
npm_client = "pnpm"
publish_client = "npm"
check_git_status = true
check_ownership = false
build = true
bump = "patch"
git_tag = "v"
changelog = true
github_release = false
remote = "origin"
# dist_tag = "next"
# sync_deps = "../consumers/*/package.json"
# sync_versions = "packages/*/package.json"
# sync_publishes = "packages/cli,packages/runtime"
"#;
