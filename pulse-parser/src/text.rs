//! Small text utilities shared by the section extractors

use regex::Regex;
use std::sync::LazyLock;

use pulse_core::MAX_ALERT_ID_LEN;

/// Domain-like identifier (`moltbook.com`, `api.clawtasks.io`)
pub(crate) static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b").unwrap()
});

/// Collapse all whitespace runs to single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase slug: non-alphanumeric runs become `-`, capped in length
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug.chars().take(MAX_ALERT_ID_LEN).collect()
}

/// Strip a leading marker (emoji, bullet, variation selectors) from a line
///
/// Returns `(marker, rest)`; the marker is empty when the line starts with
/// an alphanumeric character.
pub fn split_marker(line: &str) -> (&str, &str) {
    let trimmed = line.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric() || c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (marker, rest) = trimmed.split_at(end);
    (marker, rest.trim())
}

/// Suffixes that name a file rather than a top-level domain
const FILE_EXTENSIONS: &[&str] = &[
    "md", "js", "ts", "py", "rs", "json", "txt", "yaml", "yml", "toml", "sh", "html", "css",
];

/// First domain-like token in a piece of text, lowercased
///
/// Tokens ending in a common file extension (`skill.md`, `node.js`) are
/// skipped.
pub fn find_domain(text: &str) -> Option<String> {
    DOMAIN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .find(|token| {
            let suffix = token.rsplit('.').next().unwrap_or_default();
            !FILE_EXTENSIONS.contains(&suffix)
        })
}
