//! Custom include/exclude rule evaluation
//!
//! A [`FilterRule`] is a tiny predicate language: a field accessor combined
//! with a comparison operator. Rules are compiled once per validation pass
//! so regex patterns are not rebuilt for every comment.

use regex::{Regex, RegexBuilder};

use crate::models::{Comment, FilterRule, RuleField, RuleOperator, RuleType};

impl RuleField {
    /// Lower-cased value of this field on a comment
    ///
    /// List fields are joined with single spaces.
    pub fn value_of(&self, comment: &Comment) -> String {
        match self {
            Self::Text => comment.text.to_lowercase(),
            Self::Username => comment.username.to_lowercase(),
            Self::Mentions => comment.mentions.join(" ").to_lowercase(),
            Self::Hashtags => comment.hashtags.join(" ").to_lowercase(),
        }
    }
}

/// Operator bound to its (lower-cased) operand
#[derive(Debug, Clone)]
enum Matcher {
    Contains(String),
    Equals(String),
    StartsWith(String),
    EndsWith(String),
    /// `None` when the pattern failed to compile; such a rule never matches
    Regex(Option<Regex>),
}

impl Matcher {
    fn compile(operator: RuleOperator, value: &str) -> Self {
        let lowered = value.to_lowercase();
        match operator {
            RuleOperator::Contains => Self::Contains(lowered),
            RuleOperator::Equals => Self::Equals(lowered),
            RuleOperator::StartsWith => Self::StartsWith(lowered),
            RuleOperator::EndsWith => Self::EndsWith(lowered),
            RuleOperator::Regex => {
                let compiled = RegexBuilder::new(value).case_insensitive(true).build();
                match compiled {
                    Ok(regex) => Self::Regex(Some(regex)),
                    Err(e) => {
                        tracing::warn!(pattern = %value, error = %e, "Invalid rule pattern; rule will never match");
                        Self::Regex(None)
                    }
                }
            }
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        match self {
            Self::Contains(needle) => haystack.contains(needle.as_str()),
            Self::Equals(needle) => haystack == needle,
            Self::StartsWith(needle) => haystack.starts_with(needle.as_str()),
            Self::EndsWith(needle) => haystack.ends_with(needle.as_str()),
            Self::Regex(Some(regex)) => regex.is_match(haystack),
            Self::Regex(None) => false,
        }
    }
}

/// A single enabled rule ready for evaluation
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule_type: RuleType,
    field: RuleField,
    matcher: Matcher,
    description: String,
}

impl CompiledRule {
    pub fn compile(rule: &FilterRule) -> Self {
        Self {
            rule_type: rule.rule_type,
            field: rule.field,
            matcher: Matcher::compile(rule.operator, &rule.value),
            description: rule.describe(),
        }
    }

    /// Whether the rule's predicate holds for a comment
    pub fn matches(&self, comment: &Comment) -> bool {
        self.matcher.matches(&self.field.value_of(comment))
    }

    /// Rejection reason if this rule rejects the comment
    pub fn rejection(&self, comment: &Comment) -> Option<String> {
        let matched = self.matches(comment);
        match (self.rule_type, matched) {
            (RuleType::Include, false) => Some(format!("Must satisfy rule: {}", self.description)),
            (RuleType::Exclude, true) => Some(format!("Must not satisfy rule: {}", self.description)),
            _ => None,
        }
    }

    /// False when a regex rule failed to compile
    pub fn is_well_formed(&self) -> bool {
        !matches!(self.matcher, Matcher::Regex(None))
    }
}

/// The enabled rules of a rule list, in list order
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// Compile every enabled rule; disabled rules are skipped entirely
    pub fn compile(rules: &[FilterRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .filter(|rule| rule.enabled)
                .map(CompiledRule::compile)
                .collect(),
        }
    }

    /// First rejection reason in list order
    pub fn first_rejection(&self, comment: &Comment) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.rejection(comment))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
