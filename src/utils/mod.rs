//! Common utilities and helper functions

pub mod error;
pub mod retry;

/// Truncate text to at most `max_chars` characters, ending with `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
