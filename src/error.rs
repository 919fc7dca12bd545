//! Unified error handling for the giveaway-picker crate
//!
//! Domain errors stay in their modules ([`FetchError`], [`IngestError`],
//! [`DrawError`]); [`Error`] wraps them for the CLI and other callers that
//! cross module boundaries.
//!
//! ```rust
//! use giveaway_picker::error::{Error, ErrorCategory, PickerErrorTrait};
//! use giveaway_picker::picker::DrawError;
//!
//! let err: Error = DrawError::EmptyPool.into();
//! assert_eq!(err.category(), ErrorCategory::Draw);
//! assert!(!err.is_recoverable());
//! ```

use std::io;
use thiserror::Error;

pub use crate::picker::DrawError;
pub use crate::utils::error::{FetchError, IngestError};

/// Common interface implemented by the crate's error types
pub trait PickerErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP, timeout, rate limit and Graph API errors
    Network,
    /// Input decoding errors
    Parsing,
    /// Configuration and validation errors
    Config,
    /// Winner draw rejections
    Draw,
    /// File I/O errors
    Storage,
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Config => "config",
            Self::Draw => "draw",
            Self::Storage => "storage",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the giveaway-picker crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PickerErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Io(_) => true,
            Self::Csv(_)
            | Self::Ingest(_)
            | Self::Draw(_)
            | Self::Json(_)
            | Self::Toml(_)
            | Self::Config(_)
            | Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Ingest(_) | Self::Json(_) => ErrorCategory::Parsing,
            Self::Draw(_) => ErrorCategory::Draw,
            Self::Io(_) | Self::Csv(_) => ErrorCategory::Storage,
            Self::Toml(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
