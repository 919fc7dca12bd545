//! Error types for collection and ingestion
//!
//! Validation never errors: a bad rule or an odd comment is data, not a
//! failure. Only fetching remote comments and decoding input files can fail.

use thiserror::Error;

/// Errors that can occur while fetching comments from the Graph API
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Error body returned by the API (`{"error": {"message": ...}}`)
    #[error("API error: {0}")]
    Api(String),

    /// No access token configured
    #[error("Instagram access token is not configured")]
    MissingToken,

    /// Account, page or post lookup came back empty
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL that is not an Instagram post, reel or tv link
    #[error("Invalid Instagram URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Transient failures worth another attempt
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimit | Self::ServerError(_) | Self::Timeout => true,
            Self::Api(_)
            | Self::MissingToken
            | Self::NotFound(_)
            | Self::InvalidUrl(_) => false,
        }
    }
}

/// Errors that can occur while decoding an input file into comments
#[derive(Error, Debug)]
pub enum IngestError {
    /// JSON input that is neither a record array nor a `{data: [...]}` page
    #[error("Invalid comment JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input format could not be determined from the flag or the file extension
    #[error("Unknown input format: {0}")]
    UnknownFormat(String),
}
