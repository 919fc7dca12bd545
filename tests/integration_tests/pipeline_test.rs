//! Pipeline integration tests
//!
//! Ingest → validate → draw → export, through the public API only.

use std::collections::HashSet;

use giveaway_picker::config::CollectorConfig;
use giveaway_picker::export::{clipboard_text, export, ExportContext, ExportDocument};
use giveaway_picker::models::{
    CommentSource, FilterRule, RuleField, RuleOperator, SortMode, ValidationSettings,
};
use giveaway_picker::parser::{ingest, ingest_text, InputFormat};
use giveaway_picker::picker::{
    draw, validate_all, DrawError, DrawOptions, DrawSession, DrawState, UnsupportedFilter,
};

use super::fixtures::{GRAPH_PAGE, PASTED_COMMENTS, POST_PAGE_HTML};
use crate::common::{manual, seeded_rng, unique_pool};

fn mention_settings() -> ValidationSettings {
    ValidationSettings {
        require_mentions: true,
        ..Default::default()
    }
}

fn no_bots() -> Vec<FilterRule> {
    vec![FilterRule::exclude(
        RuleField::Username,
        RuleOperator::Contains,
        "bot",
    )]
}

#[test]
fn test_normalizer_example() {
    let comments = ingest_text("@alice: Great giveaway! #win @bob\nbob_smith - me too");

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].username, "alice");
    assert_eq!(comments[0].text, "Great giveaway! #win @bob");
    assert_eq!(comments[0].mentions, vec!["bob"]);
    assert_eq!(comments[0].hashtags, vec!["win"]);
    assert_eq!(comments[1].username, "bob_smith");
    assert_eq!(comments[1].text, "me too");
}

#[test]
fn test_min_length_example() {
    let comments = ingest_text("@alice: Great giveaway! #win @bob\nbob_smith - me too");
    let settings = ValidationSettings {
        min_comment_length: 10,
        ..Default::default()
    };

    let report = validate_all(&comments, &settings, &[]);

    assert!(report.is_valid(&comments[0].id));
    let second = report.result(&comments[1].id).unwrap();
    assert!(!second.is_valid);
    assert_eq!(
        second.reason.as_deref(),
        Some("Comment must be at least 10 characters")
    );
}

#[test]
fn test_exclude_rule_example() {
    let comments = vec![manual("winbot123", "pick me please")];
    let report = validate_all(&comments, &ValidationSettings::default(), &no_bots());

    let result = report.result(&comments[0].id).unwrap();
    assert!(!result.is_valid);
    assert_eq!(
        result.reason.as_deref(),
        Some("Must not satisfy rule: username contains \"bot\"")
    );
}

#[test]
fn test_draw_two_of_three_example() {
    let pool = unique_pool(3);
    let mut rng = seeded_rng(11);

    let winners = draw(&pool, 2, false, SortMode::Random, &mut rng).unwrap();

    assert_eq!(winners.len(), 2);
    assert_ne!(
        winners[0].username.to_lowercase(),
        winners[1].username.to_lowercase()
    );
    assert_eq!(winners[0].position, 1);
    assert_eq!(winners[1].position, 2);
}

#[test]
fn test_draw_three_of_two_example_keeps_previous_winners() {
    let mut session = DrawSession::new();
    let mut rng = seeded_rng(5);

    let first = unique_pool(3);
    let options = DrawOptions {
        winners: 1,
        ..Default::default()
    };
    let previous = session.draw_now(&first, options, &mut rng).unwrap().to_vec();

    let small = unique_pool(2);
    let err = session
        .draw_now(
            &small,
            DrawOptions {
                winners: 3,
                ..Default::default()
            },
            &mut rng,
        )
        .unwrap_err();

    assert_eq!(
        err,
        DrawError::InsufficientPool {
            requested: 3,
            available: 2
        }
    );
    assert_eq!(session.winners(), previous.as_slice());
    assert_eq!(session.state(), DrawState::Complete);
}

#[test]
fn test_validation_twice_is_identical() {
    let comments = ingest_text(PASTED_COMMENTS);
    let first = validate_all(&comments, &mention_settings(), &no_bots());
    let second = validate_all(&comments, &mention_settings(), &no_bots());

    for comment in &comments {
        assert_eq!(first.result(&comment.id), second.result(&comment.id));
    }
}

#[test]
fn test_pasted_pipeline() {
    let comments = ingest_text(PASTED_COMMENTS);
    let names: Vec<_> = comments.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(
        names,
        vec!["alice", "bob_smith", "carol", "winbot123", "dave_k", "ALICE", "user_8"]
    );

    let report = validate_all(&comments, &mention_settings(), &no_bots());
    assert_eq!(report.valid_count(), 4);
    assert_eq!(report.invalid_count(), 3);

    let valid = report.valid_comments(&comments);
    let mut rng = seeded_rng(99);

    let winners = draw(&valid, 3, false, SortMode::Random, &mut rng).unwrap();
    let unique: HashSet<String> = winners.iter().map(|w| w.username.to_lowercase()).collect();
    assert_eq!(unique.len(), 3);
    assert!(!unique.contains("winbot123"));

    // alice and ALICE are one person
    assert_eq!(
        draw(&valid, 4, false, SortMode::Random, &mut rng).unwrap_err(),
        DrawError::InsufficientPool {
            requested: 4,
            available: 3
        }
    );
    assert_eq!(draw(&valid, 4, true, SortMode::Random, &mut rng).unwrap().len(), 4);
}

#[test]
fn test_manual_input_flags_unsupported_filters() {
    let comments = ingest_text(PASTED_COMMENTS);
    let settings = ValidationSettings {
        exclude_verified: true,
        min_likes: 5,
        ..Default::default()
    };

    let report = validate_all(&comments, &settings, &[]);
    assert!(report.warnings().contains(&UnsupportedFilter::ExcludeVerified));
    assert!(report.warnings().contains(&UnsupportedFilter::MinLikes));
}

#[test]
fn test_api_pipeline_sorted_by_likes() {
    let comments = ingest(GRAPH_PAGE, InputFormat::Json, &CollectorConfig::default()).unwrap();
    assert_eq!(comments.len(), 3);
    assert!(comments.iter().all(|c| c.source == CommentSource::Api));

    let settings = ValidationSettings {
        min_likes: 1,
        ..Default::default()
    };
    let report = validate_all(&comments, &settings, &[]);
    assert!(report.warnings().is_empty());
    // the reply has no like count
    assert_eq!(report.valid_count(), 2);

    let valid = report.valid_comments(&comments);
    let mut rng = seeded_rng(1);
    let winners = draw(&valid, 2, false, SortMode::Likes, &mut rng).unwrap();
    assert_eq!(winners.len(), 2);
    assert_eq!(
        winners[0].selection_method,
        "Uniform random draw from 2 eligible entries, candidates ordered most likes first, one entry per user"
    );
}

#[test]
fn test_html_pipeline() {
    let comments = ingest(POST_PAGE_HTML, InputFormat::Html, &CollectorConfig::default()).unwrap();
    let names: Vec<_> = comments.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(names, vec!["alice_w", "carol.j"]);
    assert_eq!(comments[0].mentions, vec!["bob", "carol"]);
    assert_eq!(
        comments[1].profile_url.as_deref(),
        Some("https://instagram.com/carol.j")
    );
}

#[test]
fn test_export_round_trip_reproduces_classification() {
    let comments = ingest_text(PASTED_COMMENTS);
    let settings = mention_settings();
    let rules = no_bots();
    let report = validate_all(&comments, &settings, &rules);

    let valid = report.valid_comments(&comments);
    let mut rng = seeded_rng(3);
    let winners = draw(&valid, 2, false, SortMode::Random, &mut rng).unwrap();

    let document = export(
        &settings,
        &rules,
        &comments,
        &report,
        &winners,
        &ExportContext::default(),
    );
    let json = document.to_json_pretty().unwrap();
    let reloaded = ExportDocument::from_json(&json).unwrap();
    let reimported = reloaded.into_comments();

    let revalidated = validate_all(
        &reimported,
        &reloaded.settings.validation_settings(),
        &reloaded.settings.rules,
    );
    for exported in &reloaded.all_comments {
        assert_eq!(revalidated.is_valid(&exported.id), exported.is_valid);
    }

    let lines = clipboard_text(&reloaded.winners);
    assert_eq!(lines.lines().count(), 2);
    assert!(lines.starts_with("1. @"));
}

#[test]
fn test_export_json_reingests_as_comments() {
    let comments = ingest_text(PASTED_COMMENTS);
    let report = validate_all(&comments, &ValidationSettings::default(), &[]);
    let document = export(
        &ValidationSettings::default(),
        &[],
        &comments,
        &report,
        &[],
        &ExportContext::default(),
    );

    let json = document.to_json_pretty().unwrap();
    let reingested = ingest(&json, InputFormat::Json, &CollectorConfig::default()).unwrap();
    assert_eq!(reingested, comments);
}
