//! Graph API comment records and their mapping into [`Comment`]s
//!
//! Records come either from the live client ([`super::graph`]) or from a
//! JSON file saved earlier. Both go through [`collect`], which flattens
//! replies, applies the optional spam filter and then the `max_comments` cap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CollectorConfig;
use crate::export::ExportDocument;
use crate::models::{Comment, CommentSource};
use crate::picker::filter_spam;
use crate::utils::error::IngestError;

/// Username used when the API omits one
const UNKNOWN_USERNAME: &str = "unknown";

// ============================================================================
// Raw API Structures
// ============================================================================

/// A comment or reply record as returned by the Graph API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    pub id: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// ISO-8601, e.g. `2024-03-01T12:00:00+0000`
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub like_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<RawReplies>,
}

/// Nested `replies{...}` edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReplies {
    #[serde(default)]
    pub data: Vec<RawComment>,
}

/// One page of the comments edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentsPage {
    pub data: Vec<RawComment>,

    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

impl CommentsPage {
    pub fn next_page(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

/// `{"error": {"message": ...}}` body returned on failures
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Conversion
// ============================================================================

/// Parse a Graph API timestamp
///
/// Accepts RFC 3339 and the API's colon-less offset form.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Convert one record (without its replies) into a comment
pub fn convert_comment(raw: &RawComment) -> Comment {
    let username = raw
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(UNKNOWN_USERNAME);

    Comment::new(username, raw.text.as_deref().unwrap_or_default(), CommentSource::Api)
        .with_timestamp(raw.timestamp.as_deref().and_then(parse_timestamp))
        .with_like_count(raw.like_count.unwrap_or(0))
        .with_profile_link()
}

/// Flatten records, replies directly after their parent when enabled
pub fn flatten(raw: &[RawComment], include_replies: bool) -> Vec<Comment> {
    let mut comments = Vec::with_capacity(raw.len());
    for record in raw {
        comments.push(convert_comment(record));
        if include_replies {
            if let Some(replies) = &record.replies {
                comments.extend(replies.data.iter().map(convert_comment));
            }
        }
    }
    comments
}

/// Flatten, spam-filter and cap a batch of records
pub fn collect(raw: &[RawComment], options: &CollectorConfig) -> Vec<Comment> {
    let mut comments = flatten(raw, options.include_replies);
    let flattened = comments.len();

    if options.filter_spam {
        comments = filter_spam(comments);
    }

    if options.max_comments > 0 && comments.len() > options.max_comments {
        comments.truncate(options.max_comments);
    }

    tracing::info!(
        records = raw.len(),
        flattened,
        kept = comments.len(),
        "Collected API comments"
    );

    comments
}

// ============================================================================
// JSON Files
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum CommentFile {
    Records(Vec<RawComment>),
    Page(CommentsPage),
}

/// Load comments from JSON
///
/// Accepts a record array, a single `{data: [...]}` page, or a previous
/// export document (whose `allComments` are re-imported as-is).
pub fn parse_comment_json(json: &str, options: &CollectorConfig) -> Result<Vec<Comment>, IngestError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    if value.get("allComments").is_some() {
        let document: ExportDocument = serde_json::from_value(value)?;
        let comments = document.into_comments();
        tracing::info!(comments = comments.len(), "Re-imported exported comments");
        return Ok(comments);
    }

    let records = match serde_json::from_value::<CommentFile>(value)? {
        CommentFile::Records(records) => records,
        CommentFile::Page(page) => page.data,
    };
    Ok(collect(&records, options))
}
