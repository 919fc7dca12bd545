//! Configuration management for giveaway-picker
//!
//! Configuration comes from a TOML file or from environment variables. CLI
//! flags override individual values after loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{FilterRule, SortMode, ValidationSettings};
use crate::picker::{CompiledRule, DrawOptions};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Eligibility and draw configuration
    pub picker: PickerConfig,

    /// Comment collection configuration
    pub collector: CollectorConfig,

    /// Graph API client configuration
    pub graph: GraphConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Eligibility and draw configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub validation: ValidationSettings,

    /// Custom include/exclude rules, applied in order
    pub rules: Vec<FilterRule>,

    pub sort_mode: SortMode,

    /// Number of winners to draw
    pub winners: usize,

    /// Allow one user to win more than once
    pub allow_duplicate_users: bool,
}

/// Comment collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Flatten replies into the comment list
    pub include_replies: bool,

    /// Drop spam-looking comments before validation
    pub filter_spam: bool,

    /// Cap on collected comments (0 = unlimited)
    pub max_comments: usize,
}

/// Graph API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub base_url: String,

    pub api_version: String,

    /// Access token; usually supplied through `INSTAGRAM_ACCESS_TOKEN`
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (requests per second)
    pub rate_limit: f64,

    /// Retries per page after the first attempt
    pub max_retries: u32,

    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            validation: ValidationSettings::default(),
            rules: Vec::new(),
            sort_mode: SortMode::Random,
            winners: 1,
            allow_duplicate_users: false,
        }
    }
}

impl PickerConfig {
    #[must_use]
    pub fn draw_options(&self) -> DrawOptions {
        DrawOptions {
            winners: self.winners,
            allow_duplicate_users: self.allow_duplicate_users,
            sort_mode: self.sort_mode,
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            include_replies: true,
            filter_spam: false,
            max_comments: 0,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://graph.facebook.com"),
            api_version: String::from("v19.0"),
            access_token: None,
            request_timeout_secs: 30,
            rate_limit: 2.0,
            max_retries: 3,
            user_agent: format!("giveaway-picker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults. Rules can only be
    /// configured through a file.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let sort_mode = match std::env::var("PICKER_SORT_MODE") {
            Ok(v) => v
                .parse::<SortMode>()
                .map_err(|e| anyhow::anyhow!("PICKER_SORT_MODE: {e}"))?,
            Err(_) => defaults.picker.sort_mode,
        };

        let validation = ValidationSettings {
            min_comment_length: env_parse("PICKER_MIN_COMMENT_LENGTH")
                .unwrap_or(defaults.picker.validation.min_comment_length),
            max_comment_length: env_parse("PICKER_MAX_COMMENT_LENGTH")
                .unwrap_or(defaults.picker.validation.max_comment_length),
            require_mentions: env_flag("PICKER_REQUIRE_MENTIONS")
                .unwrap_or(defaults.picker.validation.require_mentions),
            min_mentions: env_parse("PICKER_MIN_MENTIONS")
                .unwrap_or(defaults.picker.validation.min_mentions),
            require_hashtags: env_flag("PICKER_REQUIRE_HASHTAGS")
                .unwrap_or(defaults.picker.validation.require_hashtags),
            min_hashtags: env_parse("PICKER_MIN_HASHTAGS")
                .unwrap_or(defaults.picker.validation.min_hashtags),
            exclude_verified: env_flag("PICKER_EXCLUDE_VERIFIED")
                .unwrap_or(defaults.picker.validation.exclude_verified),
            min_likes: env_parse("PICKER_MIN_LIKES").unwrap_or(defaults.picker.validation.min_likes),
        };

        Ok(Self {
            picker: PickerConfig {
                validation,
                rules: Vec::new(),
                sort_mode,
                winners: env_parse("PICKER_WINNERS").unwrap_or(defaults.picker.winners),
                allow_duplicate_users: env_flag("PICKER_ALLOW_DUPLICATE_USERS")
                    .unwrap_or(defaults.picker.allow_duplicate_users),
            },
            collector: CollectorConfig {
                include_replies: env_flag("PICKER_INCLUDE_REPLIES")
                    .unwrap_or(defaults.collector.include_replies),
                filter_spam: env_flag("PICKER_FILTER_SPAM")
                    .unwrap_or(defaults.collector.filter_spam),
                max_comments: env_parse("PICKER_MAX_COMMENTS")
                    .unwrap_or(defaults.collector.max_comments),
            },
            graph: GraphConfig {
                base_url: std::env::var("PICKER_GRAPH_BASE_URL")
                    .unwrap_or(defaults.graph.base_url),
                api_version: std::env::var("PICKER_GRAPH_API_VERSION")
                    .unwrap_or(defaults.graph.api_version),
                access_token: std::env::var("INSTAGRAM_ACCESS_TOKEN")
                    .ok()
                    .filter(|t| !t.trim().is_empty()),
                request_timeout_secs: env_parse("PICKER_REQUEST_TIMEOUT")
                    .unwrap_or(defaults.graph.request_timeout_secs),
                rate_limit: env_parse("PICKER_RATE_LIMIT").unwrap_or(defaults.graph.rate_limit),
                max_retries: env_parse("PICKER_MAX_RETRIES").unwrap_or(defaults.graph.max_retries),
                user_agent: std::env::var("PICKER_USER_AGENT")
                    .unwrap_or(defaults.graph.user_agent),
            },
            logging: LoggingConfig {
                level: std::env::var("PICKER_LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: std::env::var("PICKER_LOG_FORMAT").unwrap_or(defaults.logging.format),
            },
        })
    }

    /// Load configuration from a TOML file
    ///
    /// A token in the file is kept; otherwise `INSTAGRAM_ACCESS_TOKEN` is used.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        if config.graph.access_token.is_none() {
            config.graph.access_token = std::env::var("INSTAGRAM_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty());
        }

        Ok(config)
    }

    /// Load from `path` when given, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// Validate configuration values
    ///
    /// Malformed regex rules are not an error (they never match); they are
    /// reported as warnings.
    pub fn validate(&self) -> Result<()> {
        if self.picker.winners == 0 {
            anyhow::bail!("winners must be greater than 0");
        }

        let validation = &self.picker.validation;
        if validation.max_comment_length > 0
            && validation.max_comment_length < validation.min_comment_length
        {
            anyhow::bail!(
                "max_comment_length ({}) must not be below min_comment_length ({})",
                validation.max_comment_length,
                validation.min_comment_length
            );
        }

        if self.graph.rate_limit <= 0.0 {
            anyhow::bail!("rate_limit must be positive");
        }

        if self.graph.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        url::Url::parse(&self.graph.base_url)
            .with_context(|| format!("Invalid graph base_url: {}", self.graph.base_url))?;

        for rule in &self.picker.rules {
            if !CompiledRule::compile(rule).is_well_formed() {
                tracing::warn!(rule = %rule.describe(), "Rule pattern is not a valid regex and will never match");
            }
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.graph.request_timeout_secs)
    }
}
