//! Heuristic spam pre-filter for collected comments
//!
//! Applied at collection time (before validation) when enabled. Drops
//! comments that are too short, mostly emoji, highly repetitive, or nothing
//! but mentions.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::Comment;

static MENTION_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@\w+(\s+@\w+)*$").unwrap());

const MIN_CHARS: usize = 3;
const MAX_EMOJI_RATIO: f64 = 0.5;
const MIN_WORDS_FOR_REPETITION: usize = 5;
const MIN_UNIQUE_WORD_RATIO: f64 = 0.3;

/// Why a comment was classified as spam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamReason {
    TooShort,
    EmojiFlood,
    Repetitive,
    MentionsOnly,
}

/// Classify a comment text; `None` means it looks legitimate
pub fn spam_reason(text: &str) -> Option<SpamReason> {
    let char_count = text.chars().count();
    if char_count < MIN_CHARS {
        return Some(SpamReason::TooShort);
    }

    let emoji_count = text.chars().filter(|c| is_emoji(*c)).count();
    if emoji_count as f64 > char_count as f64 * MAX_EMOJI_RATIO {
        return Some(SpamReason::EmojiFlood);
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() > MIN_WORDS_FOR_REPETITION {
        let unique: HashSet<&str> = words.iter().copied().collect();
        if (unique.len() as f64) / (words.len() as f64) < MIN_UNIQUE_WORD_RATIO {
            return Some(SpamReason::Repetitive);
        }
    }

    if MENTION_ONLY_REGEX.is_match(text.trim()) {
        return Some(SpamReason::MentionsOnly);
    }

    None
}

/// Emoticons, pictographs, transport symbols and regional indicators
fn is_emoji(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}' |
        '\u{1F300}'..='\u{1F5FF}' |
        '\u{1F680}'..='\u{1F6FF}' |
        '\u{1F1E0}'..='\u{1F1FF}'
    )
}

/// Drop spam comments, keeping order
pub fn filter_spam(comments: Vec<Comment>) -> Vec<Comment> {
    let before = comments.len();
    let kept: Vec<Comment> = comments
        .into_iter()
        .filter(|c| spam_reason(&c.text).is_none())
        .collect();

    tracing::debug!(dropped = before - kept.len(), kept = kept.len(), "Spam filter applied");
    kept
}
