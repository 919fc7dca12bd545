//! Error handling scenarios
//!
//! Ingestion and validation never fail; draws and external fetches fail as
//! values without touching state that was already built.

use giveaway_picker::collector::fetch_media_comments;
use giveaway_picker::config::{CollectorConfig, Config};
use giveaway_picker::error::{Error, ErrorCategory, PickerErrorTrait};
use giveaway_picker::models::{FilterRule, RuleField, RuleOperator, SortMode, ValidationSettings};
use giveaway_picker::parser::{ingest, ingest_text, InputFormat};
use giveaway_picker::picker::{draw, validate_all, DrawError, DrawOptions, DrawSession, DrawState};
use giveaway_picker::utils::error::{FetchError, IngestError};

use super::fixtures::PASTED_COMMENTS;
use crate::common::{manual, seeded_rng, unique_pool};

#[test]
fn test_messy_input_is_dropped_not_raised() {
    let comments = ingest_text("\u{200B}\n\n   \nalice:\n@ : hi\nreal_user: hello there");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].username, "real_user");
}

#[test]
fn test_invalid_regex_never_matches() {
    let comments = vec![manual("alice", "anything at all")];
    let include = FilterRule::include(RuleField::Text, RuleOperator::Regex, "([unclosed");
    let exclude = FilterRule::exclude(RuleField::Text, RuleOperator::Regex, "([unclosed");

    let report = validate_all(&comments, &ValidationSettings::default(), &[exclude]);
    assert!(report.is_valid(&comments[0].id));

    let report = validate_all(&comments, &ValidationSettings::default(), &[include]);
    assert!(!report.is_valid(&comments[0].id));
}

#[test]
fn test_draw_failures_are_values() {
    let mut rng = seeded_rng(1);
    assert_eq!(
        draw(&[], 1, false, SortMode::Random, &mut rng).unwrap_err(),
        DrawError::EmptyPool
    );
    assert_eq!(
        draw(&unique_pool(2), 0, false, SortMode::Random, &mut rng).unwrap_err(),
        DrawError::NoWinnersRequested
    );

    let err: Error = DrawError::EmptyPool.into();
    assert_eq!(err.category(), ErrorCategory::Draw);
}

#[test]
fn test_failed_first_draw_returns_to_idle() {
    let mut session = DrawSession::new();
    let mut rng = seeded_rng(2);
    let options = DrawOptions {
        winners: 5,
        ..Default::default()
    };

    assert!(session.draw_now(&unique_pool(2), options, &mut rng).is_err());
    assert_eq!(session.state(), DrawState::Idle);
    assert!(session.winners().is_empty());
}

#[test]
fn test_stale_draw_cannot_commit() {
    let mut session = DrawSession::new();
    let mut rng = seeded_rng(3);
    let pool = unique_pool(4);

    let stale = session.begin();
    let current = session.begin();

    let stale_result = draw(&pool, 1, false, SortMode::Random, &mut rng);
    assert!(matches!(
        session.finish(stale, stale_result),
        Err(DrawError::Superseded { .. })
    ));
    assert!(session.winners().is_empty());

    let result = draw(&pool, 2, false, SortMode::Random, &mut rng);
    assert_eq!(session.finish(current, result).unwrap().len(), 2);
    assert_eq!(session.state(), DrawState::Complete);
}

#[test]
fn test_bad_json_input() {
    let err = ingest("{\"data\": 5}", InputFormat::Json, &CollectorConfig::default()).unwrap_err();
    assert!(matches!(err, IngestError::Json(_)));

    let err: Error = err.into();
    assert_eq!(err.category(), ErrorCategory::Parsing);
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_missing_token_leaves_comments_untouched() {
    let comments = ingest_text(PASTED_COMMENTS);
    let report = validate_all(&comments, &ValidationSettings::default(), &[]);
    let before = (comments.clone(), report.clone());

    let config = Config::default();
    let err = fetch_media_comments(&config, "17841400000000000")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MissingToken));

    assert_eq!(comments, before.0);
    assert_eq!(report, before.1);
}
