//! Common test utilities

use chrono::{DateTime, TimeZone, Utc};
use giveaway_picker::models::{Comment, CommentSource};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for draws and shuffles
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Create a manual comment
pub fn manual(username: &str, text: &str) -> Comment {
    Comment::new(username, text, CommentSource::Manual)
}

/// Create an API comment with likes and a timestamp `hour` hours into 2024
#[allow(dead_code)]
pub fn api(username: &str, text: &str, likes: u64, hour: u32) -> Comment {
    Comment::new(username, text, CommentSource::Api)
        .with_like_count(likes)
        .with_timestamp(Some(at_hour(hour)))
        .with_profile_link()
}

#[allow(dead_code)]
pub fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(i64::from(hour))
}

/// `n` comments from distinct users, each mentioning a friend
#[allow(dead_code)]
pub fn unique_pool(n: usize) -> Vec<Comment> {
    (0..n)
        .map(|i| manual(&format!("user{i}"), &format!("count me in @friend{i} #giveaway")))
        .collect()
}
