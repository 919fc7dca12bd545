//! Text sanitization for pasted, fetched and scraped comment text
//!
//! Comment text arrives from clipboards, JSON payloads and rendered pages, so
//! it routinely carries invisible characters, entities and stray whitespace.
//! These helpers strip that noise without touching the visible content.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static ANY_WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Sanitize a single line of comment input
///
/// 1. Remove zero-width characters
/// 2. Remove control characters
/// 3. Decode HTML entities
/// 4. Collapse runs of spaces/tabs
/// 5. Trim
///
/// # Examples
///
/// ```
/// use giveaway_picker::parser::sanitize::sanitize_line;
///
/// let clean = sanitize_line("  @alice:\u{200B} nice &amp; shiny\t\t ");
/// assert_eq!(clean, "@alice: nice & shiny");
/// ```
pub fn sanitize_line(line: &str) -> String {
    clean_line(line).trim().to_string()
}

/// Steps 1-4 of [`sanitize_line`], leaving edge whitespace in place
///
/// Separators such as a trailing ` | ` stay intact for the line splitter.
pub fn clean_line(line: &str) -> String {
    let mut result = remove_zero_width(line);
    result = remove_control_chars(&result);
    result = decode_html_entities(&result);
    normalize_whitespace(&result)
}

/// Flatten a text node from a scraped page or API payload into one line
///
/// Tags are stripped, entities decoded, and every whitespace run (newlines
/// included) becomes a single space.
pub fn clean_comment_content(content: &str) -> String {
    let no_tags = TAG_REGEX.replace_all(content, "");
    let decoded = decode_html_entities(&remove_zero_width(&no_tags));
    let collapsed = ANY_WHITESPACE_REGEX.replace_all(&decoded, " ");
    remove_control_chars(&collapsed).trim().to_string()
}

/// Remove zero-width spaces and similar invisible characters
///
/// Removes U+200B..=U+200F, U+2028..=U+202F and the BOM (U+FEFF).
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters except tab
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}

/// Decode HTML entities, mapping non-breaking spaces to plain spaces
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).replace('\u{00A0}', " ")
}

/// Collapse runs of spaces and tabs to a single space
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}
