//! Candidate ordering
//!
//! Sorting never mutates its input. Count-based modes are stable, so ties
//! keep their input order. Random mode is a Fisher-Yates shuffle.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;

use crate::models::{Comment, SortMode};

/// Return a newly ordered copy of `comments`
pub fn sort_comments<R: Rng + ?Sized>(
    comments: &[Comment],
    mode: SortMode,
    rng: &mut R,
) -> Vec<Comment> {
    let mut sorted = comments.to_vec();
    match mode {
        SortMode::Random => sorted.shuffle(rng),
        SortMode::Oldest => sorted.sort_by_key(sort_timestamp),
        SortMode::Newest => sorted.sort_by_key(|c| Reverse(sort_timestamp(c))),
        SortMode::Mentions => sorted.sort_by_key(|c| Reverse(c.mentions.len())),
        SortMode::Length => sorted.sort_by_key(|c| Reverse(c.text_len())),
        SortMode::Likes => sorted.sort_by_key(|c| Reverse(c.like_count)),
    }
    sorted
}

/// Timestamp used for ordering; comments without one sort as the Unix epoch
fn sort_timestamp(comment: &Comment) -> DateTime<Utc> {
    comment.timestamp.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
