//! Commit log filtering

use tracing::debug;

use crate::links::{collapse_whitespace, link_authors, link_issues};

/// Subjects with these prefixes never reach the changelog
pub const NOISE_PREFIXES: &[&str] = &[
    "release:", "chore:", "chore(", "docs:", "docs(", "ci:", "ci(", "test:", "test(",
];

/// Whether a `- <subject> by @<author>` line is release noise
pub fn is_noise(line: &str) -> bool {
    let subject = line.strip_prefix("- ").unwrap_or(line);
    NOISE_PREFIXES.iter().any(|p| subject.starts_with(p))
}

/// Rewrite one surviving line: author links, pull-request links, whitespace
pub fn rewrite_line(line: &str, repo_id: &str) -> String {
    let line = link_authors(line);
    let line = link_issues(&line, repo_id);
    collapse_whitespace(&line)
}

/// Drop noise lines and rewrite the rest, keeping their order
pub fn filter_logs<S: AsRef<str>>(lines: &[S], repo_id: &str) -> Vec<String> {
    let kept: Vec<String> = lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !is_noise(line))
        .map(|line| rewrite_line(line, repo_id))
        .collect();

    debug!(
        input = lines.len(),
        kept = kept.len(),
        "filtered commit log"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_prefixes() {
        assert!(is_noise("- chore(x): y by @a"));
        assert!(is_noise("- release: 1.0.0"));
        assert!(is_noise("- docs: readme"));
        assert!(is_noise("- ci(actions): cache"));
        assert!(is_noise("- test: more cases"));
        assert!(!is_noise("- chorex: y by @a"));
        assert!(!is_noise("- Chore: y"));
        assert!(!is_noise("- feat: chore: nested"));
    }

    #[test]
    fn test_filter_release_commits() {
        let logs = [
            "- feat: add X by @alice",
            "- release: 1.0.0",
            "- fix: Y by @bob",
        ];
        assert_eq!(
            filter_logs(&logs, "o/r"),
            vec![
                "- feat: add X by [@alice](https://github.com/alice)".to_string(),
                "- fix: Y by [@bob](https://github.com/bob)".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_links_issues() {
        let logs = [
            "- feat: new feature (#123) @umijs/tnf by @user1",
            "- fix: multiple issues (#456) (#789) by @user2",
        ];
        assert_eq!(
            filter_logs(&logs, "owner/repo"),
            vec![
                "- feat: new feature @umijs/tnf by [@user1](https://github.com/user1) in [#123](https://github.com/owner/repo/pull/123)".to_string(),
                "- fix: multiple issues by [@user2](https://github.com/user2) in [#456](https://github.com/owner/repo/pull/456) [#789](https://github.com/owner/repo/pull/789)".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_author_and_issues() {
        assert_eq!(
            filter_logs(&["- fix: Z (#1) (#2) by @carol"], "o/r"),
            vec!["- fix: Z by [@carol](https://github.com/carol) in [#1](https://github.com/o/r/pull/1) [#2](https://github.com/o/r/pull/2)".to_string()]
        );
    }

    #[test]
    fn test_filter_empty() {
        let logs: [&str; 0] = [];
        assert!(filter_logs(&logs, "o/r").is_empty());
    }

    #[test]
    fn test_filter_plain_lines_only_normalized() {
        let logs = ["- feat: add something", "- fix:  fix   something "];
        assert_eq!(
            filter_logs(&logs, "o/r"),
            vec![
                "- feat: add something".to_string(),
                "- fix: fix something".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let logs = [
            "- feat: new feature (#123) @umijs/tnf by @user1",
            "- fix: Y by @bob",
            "- perf: faster",
        ];
        let once = filter_logs(&logs, "o/r");
        let twice = filter_logs(&once, "o/r");
        assert_eq!(once, twice);
    }
}
