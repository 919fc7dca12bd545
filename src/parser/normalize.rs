//! Line-oriented normalizer for pasted comment lists
//!
//! Each non-empty line is one comment. Four layouts are recognized, tried in
//! order, and the first that matches decides the split:
//!
//! 1. `@username: text`
//! 2. `username | text`
//! 3. `username - text`
//! 4. `username text` (single-token lines get a synthetic `user_<n>` name)
//!
//! Lines yielding an empty username or empty text are dropped. Normalization
//! never fails.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::clean_username;
use crate::parser::sanitize::clean_line;

static COLON_FORMAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?([^:]+):(.*)$").unwrap());

const PIPE_SEPARATOR: &str = " | ";
const DASH_SEPARATOR: &str = " - ";

/// Which layout a line was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Colon,
    Pipe,
    Dash,
    Whitespace,
}

/// A (username, text) pair recovered from one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    /// Zero-based index of the raw input line
    pub line_index: usize,
    pub username: String,
    pub text: String,
    pub format: LineFormat,
}

/// Split a block of text into (username, text) pairs
///
/// # Examples
///
/// ```
/// use giveaway_picker::parser::normalize::normalize_text;
///
/// let lines = normalize_text("@alice: hi there\nbob | me too\nsolo");
/// assert_eq!(lines.len(), 3);
/// assert_eq!(lines[0].username, "alice");
/// assert_eq!(lines[1].text, "me too");
/// assert_eq!(lines[2].username, "user_3");
/// ```
pub fn normalize_text(raw: &str) -> Vec<NormalizedLine> {
    raw.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let parsed = normalize_line(line, index);
            if parsed.is_none() && !line.trim().is_empty() {
                tracing::debug!(line = index + 1, "Dropped unparseable comment line");
            }
            parsed
        })
        .collect()
}

/// Normalize a single line; `None` when the line is blank or unusable
pub fn normalize_line(line: &str, line_index: usize) -> Option<NormalizedLine> {
    let line = clean_line(line);
    if line.trim().is_empty() {
        return None;
    }

    let (username, text, format) = split_line(line.trim_start(), line_index);
    let username = clean_username(&username);
    let text = text.trim().to_string();

    if username.is_empty() || text.is_empty() {
        return None;
    }

    Some(NormalizedLine {
        line_index,
        username,
        text,
        format,
    })
}

fn split_line(line: &str, line_index: usize) -> (String, String, LineFormat) {
    if let Some(caps) = COLON_FORMAT_REGEX.captures(line) {
        let username = caps.get(1).map_or("", |m| m.as_str());
        let text = caps.get(2).map_or("", |m| m.as_str());
        return (username.to_string(), text.to_string(), LineFormat::Colon);
    }

    if let Some((username, text)) = line.split_once(PIPE_SEPARATOR) {
        return (username.to_string(), text.to_string(), LineFormat::Pipe);
    }

    if let Some((username, text)) = line.split_once(DASH_SEPARATOR) {
        return (username.to_string(), text.to_string(), LineFormat::Dash);
    }

    let line = line.trim_end();
    match line.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.to_string(), LineFormat::Whitespace),
        None => (
            format!("user_{}", line_index + 1),
            line.to_string(),
            LineFormat::Whitespace,
        ),
    }
}
