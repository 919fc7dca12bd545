// Core data structures for the comment picker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::parser::entities::{extract_hashtags, extract_mentions};

/// Base URL used to build profile links for collected usernames
pub const PROFILE_BASE_URL: &str = "https://instagram.com";

/// Where a comment entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentSource {
    /// Pasted or uploaded text, no metadata available
    #[default]
    Manual,
    /// Graph API records with timestamps and like counts
    Api,
    /// Scraped from a rendered post page
    Dom,
}

impl CommentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Api => "api",
            Self::Dom => "dom",
        }
    }

    /// Whether like counts coming from this source are meaningful
    pub fn has_like_counts(&self) -> bool {
        matches!(self, Self::Api)
    }

    /// Whether the verified flag coming from this source is meaningful
    pub fn has_verified_flag(&self) -> bool {
        matches!(self, Self::Api | Self::Dom)
    }
}

/// A single normalized comment
///
/// Comments are immutable after ingestion. Mentions and hashtags are
/// extracted once in [`Comment::new`] and never recomputed; validity lives in
/// a separate [`crate::picker::ValidationReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
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
}

impl Comment {
    /// Create a comment with a fresh id and extracted entities
    ///
    /// The username loses its leading `@` and the text is trimmed.
    pub fn new(username: &str, text: &str, source: CommentSource) -> Self {
        let text = text.trim().to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            username: clean_username(username),
            mentions: extract_mentions(&text),
            hashtags: extract_hashtags(&text),
            text,
            timestamp: None,
            like_count: 0,
            verified: false,
            profile_url: None,
            source,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_like_count(mut self, like_count: u64) -> Self {
        self.like_count = like_count;
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Attach the default profile link for this comment's username
    pub fn with_profile_link(mut self) -> Self {
        self.profile_url = Some(profile_url(&self.username));
        self
    }

    /// Lower-cased username used for per-person deduplication
    pub fn user_key(&self) -> String {
        self.username.to_lowercase()
    }

    /// Text length in characters
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Strip surrounding whitespace and a leading `@` from a handle
pub fn clean_username(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed).trim().to_string()
}

/// Build the public profile URL for a username
pub fn profile_url(username: &str) -> String {
    format!("{PROFILE_BASE_URL}/{username}")
}

// ============================================================================
// Filter rules
// ============================================================================

/// Whether a rule admits or rejects matching comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Include,
    Exclude,
}

/// Comment field a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    Text,
    Username,
    Mentions,
    Hashtags,
}

impl RuleField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Username => "username",
            Self::Mentions => "mentions",
            Self::Hashtags => "hashtags",
        }
    }
}

/// Comparison applied between the field value and the rule value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    Regex,
}

impl RuleOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Regex => "regex",
        }
    }
}

/// User-defined include/exclude predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default = "new_rule_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

fn new_rule_id() -> String {
    Uuid::new_v4().to_string()
}

impl FilterRule {
    /// Create an enabled rule with a fresh id
    pub fn new(rule_type: RuleType, field: RuleField, operator: RuleOperator, value: &str) -> Self {
        Self {
            id: new_rule_id(),
            rule_type,
            field,
            operator,
            value: value.to_string(),
            enabled: true,
        }
    }

    pub fn include(field: RuleField, operator: RuleOperator, value: &str) -> Self {
        Self::new(RuleType::Include, field, operator, value)
    }

    pub fn exclude(field: RuleField, operator: RuleOperator, value: &str) -> Self {
        Self::new(RuleType::Exclude, field, operator, value)
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Short description used in rejection reasons
    pub fn describe(&self) -> String {
        format!(
            "{} {} \"{}\"",
            self.field.as_str(),
            self.operator.as_str(),
            self.value
        )
    }
}

// ============================================================================
// Validation settings
// ============================================================================

/// Numeric and boolean eligibility thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub min_comment_length: usize,
    /// 0 means unbounded
    pub max_comment_length: usize,
    pub require_mentions: bool,
    pub min_mentions: usize,
    pub require_hashtags: bool,
    pub min_hashtags: usize,
    pub exclude_verified: bool,
    /// 0 disables the like filter
    pub min_likes: u64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_comment_length: 0,
            max_comment_length: 0,
            require_mentions: false,
            min_mentions: 1,
            require_hashtags: false,
            min_hashtags: 1,
            exclude_verified: false,
            min_likes: 0,
        }
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Candidate ordering applied before a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Random,
    Oldest,
    Newest,
    Mentions,
    Length,
    Likes,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Oldest => "oldest",
            Self::Newest => "newest",
            Self::Mentions => "mentions",
            Self::Length => "length",
            Self::Likes => "likes",
        }
    }

    /// Parse a mode name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "random" => Some(Self::Random),
            "oldest" => Some(Self::Oldest),
            "newest" => Some(Self::Newest),
            "mentions" | "most-mentions" => Some(Self::Mentions),
            "length" | "longest" => Some(Self::Length),
            "likes" | "most-likes" => Some(Self::Likes),
            _ => None,
        }
    }

    /// Human-readable label used in winner provenance
    pub fn label(&self) -> &'static str {
        match self {
            Self::Random => "random order",
            Self::Oldest => "oldest first",
            Self::Newest => "newest first",
            Self::Mentions => "most mentions first",
            Self::Length => "longest comments first",
            Self::Likes => "most likes first",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Random,
            Self::Oldest,
            Self::Newest,
            Self::Mentions,
            Self::Length,
            Self::Likes,
        ]
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sort mode: {s}"))
    }
}

// ============================================================================
// Winners
// ============================================================================

/// Immutable record of a drawn winner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub position: usize,
    pub comment_id: String,
    pub username: String,
    pub text: String,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub like_count: u64,
    pub profile_url: Option<String>,
    pub selection_method: String,
    pub selection_timestamp: DateTime<Utc>,
}

impl Winner {
    /// Snapshot a comment as the winner at `position`
    pub fn from_comment(
        comment: &Comment,
        position: usize,
        selection_method: &str,
        selection_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            position,
            comment_id: comment.id.clone(),
            username: comment.username.clone(),
            text: comment.text.clone(),
            mentions: comment.mentions.clone(),
            hashtags: comment.hashtags.clone(),
            timestamp: comment.timestamp,
            like_count: comment.like_count,
            profile_url: comment.profile_url.clone(),
            selection_method: selection_method.to_string(),
            selection_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_new_strips_at_and_trims() {
        let comment = Comment::new("@alice", "  hello @bob #win  ", CommentSource::Manual);
        assert_eq!(comment.username, "alice");
        assert_eq!(comment.text, "hello @bob #win");
        assert_eq!(comment.mentions, vec!["bob"]);
        assert_eq!(comment.hashtags, vec!["win"]);
        assert_eq!(comment.like_count, 0);
        assert!(!comment.verified);
        assert!(comment.timestamp.is_none());
    }

    #[test]
    fn test_comment_ids_are_unique() {
        let a = Comment::new("a", "x", CommentSource::Manual);
        let b = Comment::new("a", "x", CommentSource::Manual);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_profile_link() {
        let comment = Comment::new("alice", "hi", CommentSource::Api).with_profile_link();
        assert_eq!(
            comment.profile_url.as_deref(),
            Some("https://instagram.com/alice")
        );
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!(SortMode::parse("NEWEST"), Some(SortMode::Newest));
        assert_eq!(SortMode::parse("most-likes"), Some(SortMode::Likes));
        assert_eq!(SortMode::parse("sideways"), None);
        assert_eq!(SortMode::default(), SortMode::Random);
    }

    #[test]
    fn test_filter_rule_serde_shape() {
        let rule = FilterRule::exclude(RuleField::Username, RuleOperator::StartsWith, "bot");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "exclude");
        assert_eq!(json["field"], "username");
        assert_eq!(json["operator"], "starts_with");
        assert_eq!(json["enabled"], true);
    }

    #[test]
    fn test_source_metadata_flags() {
        assert!(!CommentSource::Manual.has_like_counts());
        assert!(!CommentSource::Manual.has_verified_flag());
        assert!(CommentSource::Api.has_like_counts());
        assert!(CommentSource::Dom.has_verified_flag());
        assert!(!CommentSource::Dom.has_like_counts());
    }
}
