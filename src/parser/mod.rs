//! Comment ingestion: text normalization, entity extraction and page scraping
//!
//! Every ingestion path ends in the same [`Comment`] shape so that the
//! validator and drawer never need to know where a comment came from.

pub mod dom;
pub mod entities;
pub mod normalize;
pub mod sanitize;
pub mod selectors;

pub use dom::CommentScraper;
pub use entities::{extract_hashtags, extract_mentions};
pub use normalize::{normalize_line, normalize_text, LineFormat, NormalizedLine};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::collector::api::parse_comment_json;
use crate::config::CollectorConfig;
use crate::models::{Comment, CommentSource};
use crate::utils::error::IngestError;

/// Shape of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// One comment per line, as pasted from the post
    Text,
    /// Graph API records or a previous export
    Json,
    /// Saved post page
    Html,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Html => "html",
        }
    }

    /// Guess the format from a file extension; unknown extensions are text
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("html" | "htm") => Self::Html,
            _ => Self::Text,
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" | "htm" => Ok(Self::Html),
            other => Err(IngestError::UnknownFormat(other.to_string())),
        }
    }
}

/// Build comments from input content of the given format
///
/// Only JSON can fail; text and HTML drop what they cannot read.
pub fn ingest(
    content: &str,
    format: InputFormat,
    options: &CollectorConfig,
) -> Result<Vec<Comment>, IngestError> {
    match format {
        InputFormat::Text => Ok(ingest_text(content)),
        InputFormat::Html => Ok(ingest_html(content)),
        InputFormat::Json => parse_comment_json(content, options),
    }
}

/// Build comments from a pasted or uploaded block of text
///
/// Unparseable lines are dropped; this never fails.
///
/// # Examples
///
/// ```
/// use giveaway_picker::parser::ingest_text;
///
/// let comments = ingest_text("@alice: Great giveaway! #win @bob\nbob_smith - me too");
/// assert_eq!(comments.len(), 2);
/// assert_eq!(comments[0].mentions, vec!["bob"]);
/// assert_eq!(comments[1].username, "bob_smith");
/// ```
pub fn ingest_text(raw: &str) -> Vec<Comment> {
    let comments: Vec<Comment> = normalize_text(raw)
        .into_iter()
        .map(|line| Comment::new(&line.username, &line.text, CommentSource::Manual))
        .collect();

    tracing::info!(
        lines = raw.lines().count(),
        comments = comments.len(),
        "Ingested pasted comments"
    );
    comments
}

/// Build comments from the HTML of a rendered post page
pub fn ingest_html(html: &str) -> Vec<Comment> {
    let comments = CommentScraper::new().scrape(html);
    tracing::info!(comments = comments.len(), "Ingested scraped comments");
    comments
}
