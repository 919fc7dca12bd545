//! Comment collection from Instagram
//!
//! - [`url`]: post link parsing
//! - [`api`]: Graph API records and their conversion into comments
//! - [`graph`]: async client paging through a media object's comments

pub mod api;
pub mod graph;
pub mod url;

pub use api::{collect, convert_comment, parse_comment_json, CommentsPage, RawComment};
pub use graph::{GraphClient, MediaTarget};
pub use url::{extract_post_id, is_valid_instagram_url, parse_post_url, PostUrl};

use crate::config::Config;
use crate::models::Comment;
use crate::utils::error::FetchError;

/// Collect the comments of a post link using the configured client
pub async fn fetch_post_comments(config: &Config, post_url: &str) -> Result<Vec<Comment>, FetchError> {
    let post = parse_post_url(post_url)?;
    let client = GraphClient::new(&config.graph)?;
    let target = client.resolve_media(&post).await?;
    client.fetch_comments(&target, &config.collector).await
}

/// Collect the comments of a known media id
pub async fn fetch_media_comments(config: &Config, media_id: &str) -> Result<Vec<Comment>, FetchError> {
    let client = GraphClient::new(&config.graph)?;
    client
        .fetch_comments(&MediaTarget::new(media_id), &config.collector)
        .await
}
