//! Line rewriting passes
//!
//! Each pass takes one changelog line and returns a new one. Every pass is
//! idempotent: running it over its own output changes nothing.

use std::sync::LazyLock;

use regex::Regex;

/// Marker that introduces the commit author at the end of a line
const AUTHOR_MARKER: &str = "by @";

/// Pull-request reference in a commit subject, e.g. `(#123)`
static ISSUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("Invalid regex"));

/// Link every standalone mention of the trailing author to their profile.
///
/// The handle is everything after the last `by @`. Mentions that are already
/// the text of a Markdown link, or that are a prefix of a longer handle, are
/// left alone.
pub fn link_authors(line: &str) -> String {
    let Some(pos) = line.rfind(AUTHOR_MARKER) else {
        return line.to_string();
    };
    let handle = line[pos + AUTHOR_MARKER.len()..].trim();
    if handle.is_empty() {
        return line.to_string();
    }

    let mention = format!("@{}", handle);
    let linked = format!("[@{}](https://github.com/{})", handle, handle);

    let mut out = String::with_capacity(line.len() + linked.len());
    let mut rest = line;
    while let Some(idx) = rest.find(&mention) {
        let (before, after) = rest.split_at(idx);
        let tail = &after[mention.len()..];

        let inside_link = before.ends_with('[') && tail.starts_with("](");
        let longer_handle = tail.chars().next().is_some_and(is_handle_char);

        out.push_str(before);
        if inside_link || longer_handle {
            out.push_str(&mention);
        } else {
            out.push_str(&linked);
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Move `(#n)` references to the end of the line as pull-request links
pub fn link_issues(line: &str, repo_id: &str) -> String {
    let numbers: Vec<&str> = ISSUE_REGEX
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if numbers.is_empty() {
        return line.to_string();
    }

    let stripped = ISSUE_REGEX.replace_all(line, "");
    let links = numbers
        .iter()
        .map(|n| format!("[#{}](https://github.com/{}/pull/{})", n, repo_id, n))
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} in {}", stripped.trim_end(), links)
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_handle_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
