//! Comment eligibility validation
//!
//! Validation is a total, side-effect-free function of a comment, the
//! current [`ValidationSettings`] and the current rule list. Results are kept
//! out of the comments themselves, in a [`ValidationReport`] keyed by comment
//! id, so a settings change simply produces a new report.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Comment, FilterRule, ValidationSettings};
use crate::picker::rules::CompiledRules;

/// Outcome of validating a single comment
///
/// `reason` is present exactly when `is_valid` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// A filter that has no effect for the current input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedFilter {
    /// `exclude_verified` is set but no comment carries a verified flag
    ExcludeVerified,
    /// `min_likes` is set but no comment carries a like count
    MinLikes,
}

impl UnsupportedFilter {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ExcludeVerified => {
                "Verified-account exclusion has no effect: these comments carry no verification data"
            }
            Self::MinLikes => {
                "Minimum-likes filter has no effect: these comments carry no like counts"
            }
        }
    }
}

/// Validator bound to one settings snapshot and rule list
#[derive(Debug, Clone)]
pub struct Validator {
    settings: ValidationSettings,
    rules: CompiledRules,
}

impl Validator {
    pub fn new(settings: &ValidationSettings, rules: &[FilterRule]) -> Self {
        Self {
            settings: settings.clone(),
            rules: CompiledRules::compile(rules),
        }
    }

    /// Classify one comment, reporting the first failing check
    pub fn validate(&self, comment: &Comment) -> ValidationResult {
        let s = &self.settings;
        let length = comment.text_len();

        if length < s.min_comment_length {
            return ValidationResult::invalid(format!(
                "Comment must be at least {} characters",
                s.min_comment_length
            ));
        }

        if s.max_comment_length > 0 && length > s.max_comment_length {
            return ValidationResult::invalid(format!(
                "Comment must be at most {} characters",
                s.max_comment_length
            ));
        }

        if s.require_mentions && comment.mentions.len() < s.min_mentions {
            return ValidationResult::invalid(format!(
                "Must mention at least {} user(s)",
                s.min_mentions
            ));
        }

        if s.require_hashtags && comment.hashtags.len() < s.min_hashtags {
            return ValidationResult::invalid(format!(
                "Must include at least {} hashtag(s)",
                s.min_hashtags
            ));
        }

        if s.exclude_verified && comment.verified {
            return ValidationResult::invalid("Verified accounts are excluded");
        }

        if s.min_likes > 0 && comment.like_count < s.min_likes {
            return ValidationResult::invalid(format!(
                "Must have at least {} like(s)",
                s.min_likes
            ));
        }

        match self.rules.first_rejection(comment) {
            Some(reason) => ValidationResult::invalid(reason),
            None => ValidationResult::valid(),
        }
    }

    /// Validate a whole comment set
    pub fn validate_all(&self, comments: &[Comment]) -> ValidationReport {
        let results: HashMap<String, ValidationResult> = comments
            .iter()
            .map(|comment| (comment.id.clone(), self.validate(comment)))
            .collect();

        let warnings = unsupported_filters(&self.settings, comments);
        for warning in &warnings {
            tracing::warn!(filter = ?warning, "{}", warning.message());
        }

        let report = ValidationReport { results, warnings };
        tracing::info!(
            total = comments.len(),
            valid = report.valid_count(),
            invalid = report.invalid_count(),
            rules = self.rules.len(),
            "Validated comments"
        );
        report
    }
}

/// Validate a single comment
///
/// # Examples
///
/// ```
/// use giveaway_picker::models::{Comment, CommentSource, ValidationSettings};
/// use giveaway_picker::picker::validate;
///
/// let settings = ValidationSettings { min_comment_length: 10, ..Default::default() };
/// let short = Comment::new("bob_smith", "me too", CommentSource::Manual);
/// let result = validate(&short, &settings, &[]);
/// assert!(!result.is_valid);
/// assert!(result.reason.unwrap().contains("10"));
/// ```
pub fn validate(
    comment: &Comment,
    settings: &ValidationSettings,
    rules: &[FilterRule],
) -> ValidationResult {
    Validator::new(settings, rules).validate(comment)
}

/// Validate every comment against one settings snapshot
pub fn validate_all(
    comments: &[Comment],
    settings: &ValidationSettings,
    rules: &[FilterRule],
) -> ValidationReport {
    Validator::new(settings, rules).validate_all(comments)
}

/// Filters that are active but meaningless for the given comments
pub fn unsupported_filters(
    settings: &ValidationSettings,
    comments: &[Comment],
) -> Vec<UnsupportedFilter> {
    let mut warnings = Vec::new();
    if comments.is_empty() {
        return warnings;
    }

    if settings.exclude_verified && !comments.iter().any(|c| c.source.has_verified_flag()) {
        warnings.push(UnsupportedFilter::ExcludeVerified);
    }

    if settings.min_likes > 0 && !comments.iter().any(|c| c.source.has_like_counts()) {
        warnings.push(UnsupportedFilter::MinLikes);
    }

    warnings
}

/// Validation results for one comment set under one settings snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    results: HashMap<String, ValidationResult>,
    warnings: Vec<UnsupportedFilter>,
}

impl ValidationReport {
    /// Result for a comment id, if it was part of the validated set
    pub fn result(&self, comment_id: &str) -> Option<&ValidationResult> {
        self.results.get(comment_id)
    }

    /// Whether a comment was classified valid; unknown ids are not valid
    pub fn is_valid(&self, comment_id: &str) -> bool {
        self.result(comment_id).is_some_and(|r| r.is_valid)
    }

    /// Valid comments from `comments`, in input order
    pub fn valid_comments(&self, comments: &[Comment]) -> Vec<Comment> {
        comments
            .iter()
            .filter(|c| self.is_valid(&c.id))
            .cloned()
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.results.values().filter(|r| r.is_valid).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.results.len() - self.valid_count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn warnings(&self) -> &[UnsupportedFilter] {
        &self.warnings
    }
}
