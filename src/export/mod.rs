//! Result export
//!
//! An [`ExportDocument`] is a pure projection of the current picker state:
//! settings echo, statistics, winners and every comment with its last
//! computed validity. Nothing is re-validated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::models::{Comment, CommentSource, FilterRule, SortMode, ValidationSettings, Winner};
use crate::picker::{DrawOptions, ValidationReport, ValidationResult};

/// Tool name recorded in exports
pub const TOOL_NAME: &str = "GiveawayHub Instagram Comment Picker";

const NOT_VALIDATED_REASON: &str = "Not validated";

/// Where the export came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiveawayInfo {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source_url: Option<String>,
    pub tool: String,
    pub version: String,
}

/// Eligibility settings as written into an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportedValidation {
    pub min_comment_length: usize,
    pub max_comment_length: usize,
    pub require_mentions: bool,
    pub min_mentions: usize,
    pub require_hashtags: bool,
    pub min_hashtags: usize,
    pub exclude_verified: bool,
    pub min_likes: u64,
}

impl Default for ExportedValidation {
    fn default() -> Self {
        Self::from(&ValidationSettings::default())
    }
}

impl From<&ValidationSettings> for ExportedValidation {
    fn from(settings: &ValidationSettings) -> Self {
        Self {
            min_comment_length: settings.min_comment_length,
            max_comment_length: settings.max_comment_length,
            require_mentions: settings.require_mentions,
            min_mentions: settings.min_mentions,
            require_hashtags: settings.require_hashtags,
            min_hashtags: settings.min_hashtags,
            exclude_verified: settings.exclude_verified,
            min_likes: settings.min_likes,
        }
    }
}

impl From<&ExportedValidation> for ValidationSettings {
    fn from(exported: &ExportedValidation) -> Self {
        Self {
            min_comment_length: exported.min_comment_length,
            max_comment_length: exported.max_comment_length,
            require_mentions: exported.require_mentions,
            min_mentions: exported.min_mentions,
            require_hashtags: exported.require_hashtags,
            min_hashtags: exported.min_hashtags,
            exclude_verified: exported.exclude_verified,
            min_likes: exported.min_likes,
        }
    }
}

/// Settings in effect when the export was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub validation: ExportedValidation,
    /// Enabled rules only
    pub rules: Vec<FilterRule>,
    pub sort_mode: SortMode,
    pub allow_duplicate_users: bool,
    pub number_of_winners: usize,
}

impl ExportSettings {
    /// The eligibility settings in their configuration form
    pub fn validation_settings(&self) -> ValidationSettings {
        ValidationSettings::from(&self.validation)
    }
}

/// Aggregate counts over the exported comments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_comments: usize,
    pub valid_comments: usize,
    pub invalid_comments: usize,
    pub unique_users: usize,
    pub total_mentions: usize,
    pub total_hashtags: usize,
    pub total_likes: u64,
    pub average_comment_length: f64,
    pub average_likes: f64,
}

/// A comment snapshot with its validity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedComment {
    pub id: String,
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub source: CommentSource,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExportedComment {
    fn snapshot(comment: &Comment, result: &ValidationResult) -> Self {
        Self {
            id: comment.id.clone(),
            username: comment.username.clone(),
            text: comment.text.clone(),
            timestamp: comment.timestamp,
            like_count: comment.like_count,
            verified: comment.verified,
            mentions: comment.mentions.clone(),
            hashtags: comment.hashtags.clone(),
            profile_url: comment.profile_url.clone(),
            source: comment.source,
            is_valid: result.is_valid,
            reason: result.reason.clone(),
        }
    }

    /// Rebuild the comment exactly as exported (entities are not re-extracted)
    pub fn to_comment(&self) -> Comment {
        Comment {
            id: self.id.clone(),
            username: self.username.clone(),
            text: self.text.clone(),
            timestamp: self.timestamp,
            like_count: self.like_count,
            verified: self.verified,
            mentions: self.mentions.clone(),
            hashtags: self.hashtags.clone(),
            profile_url: self.profile_url.clone(),
            source: self.source,
        }
    }
}

/// The full export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub giveaway: GiveawayInfo,
    pub settings: ExportSettings,
    pub statistics: Statistics,
    pub winners: Vec<Winner>,
    pub all_comments: Vec<ExportedComment>,
}

impl ExportDocument {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document as pretty JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        tracing::info!(path = %path.display(), comments = self.all_comments.len(), "Exported results");
        Ok(())
    }

    /// Write `allComments` as CSV, one row per comment
    pub fn write_csv_to(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        write_csv(&self.all_comments, file)?;
        tracing::info!(path = %path.display(), rows = self.all_comments.len(), "Exported comments as CSV");
        Ok(())
    }

    /// Re-import the `allComments` section
    pub fn into_comments(&self) -> Vec<Comment> {
        self.all_comments.iter().map(ExportedComment::to_comment).collect()
    }
}

/// Everything besides settings and comments that an export records
#[derive(Debug, Clone, Default)]
pub struct ExportContext {
    pub draw: DrawOptions,
    pub source_url: Option<String>,
}

/// Project the current picker state into an export document
pub fn export(
    settings: &ValidationSettings,
    rules: &[FilterRule],
    comments: &[Comment],
    report: &ValidationReport,
    winners: &[Winner],
    context: &ExportContext,
) -> ExportDocument {
    let not_validated = ValidationResult::invalid(NOT_VALIDATED_REASON);
    let all_comments: Vec<ExportedComment> = comments
        .iter()
        .map(|c| ExportedComment::snapshot(c, report.result(&c.id).unwrap_or(&not_validated)))
        .collect();

    ExportDocument {
        giveaway: GiveawayInfo {
            timestamp: Utc::now(),
            source_url: context.source_url.clone(),
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        settings: ExportSettings {
            validation: ExportedValidation::from(settings),
            rules: rules.iter().filter(|r| r.enabled).cloned().collect(),
            sort_mode: context.draw.sort_mode,
            allow_duplicate_users: context.draw.allow_duplicate_users,
            number_of_winners: context.draw.winners,
        },
        statistics: statistics(&all_comments),
        winners: winners.to_vec(),
        all_comments,
    }
}

/// Compute aggregate statistics over exported comments
pub fn statistics(comments: &[ExportedComment]) -> Statistics {
    let total = comments.len();
    if total == 0 {
        return Statistics::default();
    }

    let valid = comments.iter().filter(|c| c.is_valid).count();
    let unique_users: HashSet<String> = comments.iter().map(|c| c.username.to_lowercase()).collect();
    let total_chars: usize = comments.iter().map(|c| c.text.chars().count()).sum();
    let total_likes: u64 = comments.iter().map(|c| c.like_count).sum();

    Statistics {
        total_comments: total,
        valid_comments: valid,
        invalid_comments: total - valid,
        unique_users: unique_users.len(),
        total_mentions: comments.iter().map(|c| c.mentions.len()).sum(),
        total_hashtags: comments.iter().map(|c| c.hashtags.len()).sum(),
        total_likes,
        average_comment_length: total_chars as f64 / total as f64,
        average_likes: total_likes as f64 / total as f64,
    }
}

/// Column order of the CSV export
pub const CSV_HEADERS: [&str; 8] = [
    "username",
    "text",
    "timestamp",
    "like_count",
    "verified",
    "isValid",
    "reason",
    "profile_url",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    username: &'a str,
    text: &'a str,
    timestamp: Option<String>,
    like_count: u64,
    verified: bool,
    is_valid: bool,
    reason: &'a str,
    profile_url: &'a str,
}

/// Write exported comments as CSV
///
/// The header row is always written, so an empty export is still a valid
/// table. Missing timestamps, reasons and profile links are empty cells.
pub fn write_csv<W: std::io::Write>(comments: &[ExportedComment], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for comment in comments {
        csv_writer.serialize(CsvRow {
            username: &comment.username,
            text: &comment.text,
            timestamp: comment.timestamp.map(|t| t.to_rfc3339()),
            like_count: comment.like_count,
            verified: comment.verified,
            is_valid: comment.is_valid,
            reason: comment.reason.as_deref().unwrap_or_default(),
            profile_url: comment.profile_url.as_deref().unwrap_or_default(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Plain-text winner list, one `position. @username: text` line each
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use giveaway_picker::export::clipboard_text;
/// use giveaway_picker::models::{Comment, CommentSource, Winner};
///
/// let comment = Comment::new("alice", "pick me", CommentSource::Manual);
/// let winner = Winner::from_comment(&comment, 1, "test", Utc::now());
/// assert_eq!(clipboard_text(&[winner]), "1. @alice: pick me");
/// ```
pub fn clipboard_text(winners: &[Winner]) -> String {
    winners
        .iter()
        .map(|w| format!("{}. @{}: {}", w.position, w.username, w.text))
        .collect::<Vec<_>>()
        .join("\n")
}
