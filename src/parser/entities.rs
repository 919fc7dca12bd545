//! `@mention` and `#hashtag` extraction
//!
//! Entities are pulled out once when a comment is created and cached on it.
//! Order, duplicates and case are preserved exactly as typed.

use regex::Regex;
use std::sync::LazyLock;

static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([\w.]+)").unwrap());

static HASHTAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());

/// Extract mentioned handles (without `@`)
///
/// # Examples
///
/// ```
/// use giveaway_picker::parser::entities::extract_mentions;
///
/// let mentions = extract_mentions("tagging @Bob and @carol.x and @Bob");
/// assert_eq!(mentions, vec!["Bob", "carol.x", "Bob"]);
/// ```
pub fn extract_mentions(text: &str) -> Vec<String> {
    MENTION_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract hashtags (without `#`)
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
