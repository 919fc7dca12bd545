//! Eligibility, ordering and winner selection
//!
//! The picker is synchronous and pure apart from the injected random number
//! generator:
//!
//! - [`validate`] / [`Validator`] classify comments under a settings snapshot
//! - [`sort_comments`] orders candidates
//! - [`draw`] / [`DrawSession`] select winners without replacement
//! - [`spam`] holds the optional collection-time spam heuristics

pub mod draw;
pub mod rules;
pub mod sort;
pub mod spam;
pub mod validate;

pub use draw::{
    build_pool, draw, selection_method, DrawError, DrawOptions, DrawSession, DrawState, DrawTicket,
};
pub use rules::{CompiledRule, CompiledRules};
pub use sort::sort_comments;
pub use spam::{filter_spam, spam_reason, SpamReason};
pub use validate::{
    unsupported_filters, validate, validate_all, UnsupportedFilter, ValidationReport,
    ValidationResult, Validator,
};
