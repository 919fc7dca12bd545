//! giveaway-picker - Instagram comment picker
//!
//! Turns raw comment sources (pasted text, Graph API records, a saved post
//! page) into comments, filters them against a rule set, orders them and
//! draws winners without replacement.
//!
//! # Architecture
//!
//! - [`parser`] - Text normalization, entity extraction and page scraping
//! - [`picker`] - Validation, sorting, spam heuristics and the winner draw
//! - [`export`] - Export document and clipboard text
//! - [`collector`] - Instagram URL parsing and the Graph API client
//! - [`models`] - Core data structures and types
//! - [`config`] - Configuration management and settings
//! - [`utils`] - Retry and other helpers
//!
//! # Example
//!
//! ```
//! use giveaway_picker::prelude::*;
//! use rand::SeedableRng;
//!
//! let comments = ingest_text("@alice: Great giveaway! #win @bob\nbob_smith - me too");
//! let settings = ValidationSettings {
//!     require_mentions: true,
//!     ..Default::default()
//! };
//!
//! let report = validate_all(&comments, &settings, &[]);
//! assert_eq!(report.valid_count(), 1);
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
//! let valid = report.valid_comments(&comments);
//! let winners = draw(&valid, 1, false, SortMode::Random, &mut rng)?;
//! assert_eq!(winners[0].username, "alice");
//! # Ok::<(), giveaway_picker::error::Error>(())
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod picker;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, PickerErrorTrait, Result};
    pub use crate::export::{clipboard_text, export, ExportContext, ExportDocument};
    pub use crate::models::{
        Comment, CommentSource, FilterRule, RuleField, RuleOperator, RuleType, SortMode,
        ValidationSettings, Winner,
    };
    pub use crate::parser::{ingest, ingest_html, ingest_text, InputFormat};
    pub use crate::picker::{
        draw, sort_comments, validate, validate_all, DrawError, DrawOptions, DrawSession,
        ValidationReport, ValidationResult,
    };
}

// Direct re-exports for convenience
pub use models::{Comment, FilterRule, SortMode, ValidationSettings, Winner};
