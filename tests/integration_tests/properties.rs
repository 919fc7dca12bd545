//! Property tests for the validator, drawer and exporter

use proptest::prelude::*;
use std::collections::HashSet;

use giveaway_picker::export::{export, ExportContext, ExportDocument};
use giveaway_picker::models::{
    Comment, CommentSource, FilterRule, RuleField, RuleOperator, RuleType, SortMode,
    ValidationSettings,
};
use giveaway_picker::picker::{draw, validate_all, DrawOptions, DrawSession};

use crate::common::seeded_rng;

const USERNAMES: &[&str] = &["alice", "Alice", "ALICE", "bob", "carol", "dave_k", "winbot", "erin"];

fn comment_strategy() -> impl Strategy<Value = Comment> {
    (
        prop::sample::select(USERNAMES),
        "[a-z0-9 @#_]{0,40}",
        0u64..50,
        any::<bool>(),
    )
        .prop_map(|(username, text, likes, verified)| {
            Comment::new(username, &text, CommentSource::Api)
                .with_like_count(likes)
                .with_verified(verified)
        })
}

fn settings_strategy() -> impl Strategy<Value = ValidationSettings> {
    (
        0usize..20,
        prop_oneof![Just(0usize), 10usize..60],
        any::<bool>(),
        0usize..3,
        any::<bool>(),
        0usize..3,
        any::<bool>(),
        0u64..20,
    )
        .prop_map(
            |(min_len, max_len, req_m, min_m, req_h, min_h, excl_v, min_likes)| ValidationSettings {
                min_comment_length: min_len,
                max_comment_length: max_len,
                require_mentions: req_m,
                min_mentions: min_m,
                require_hashtags: req_h,
                min_hashtags: min_h,
                exclude_verified: excl_v,
                min_likes,
            },
        )
}

fn rule_strategy() -> impl Strategy<Value = FilterRule> {
    (
        prop::sample::select(vec![RuleType::Include, RuleType::Exclude]),
        prop::sample::select(vec![
            RuleField::Text,
            RuleField::Username,
            RuleField::Mentions,
            RuleField::Hashtags,
        ]),
        prop::sample::select(vec![
            RuleOperator::Contains,
            RuleOperator::Equals,
            RuleOperator::StartsWith,
            RuleOperator::EndsWith,
            RuleOperator::Regex,
        ]),
        prop::sample::select(vec!["a", "bot", "ALICE", "win", "^[a-z]+$", "(", "\\d"]),
        any::<bool>(),
    )
        .prop_map(|(rule_type, field, operator, value, enabled)| {
            let rule = FilterRule::new(rule_type, field, operator, value);
            if enabled {
                rule
            } else {
                rule.disabled()
            }
        })
}

fn sort_strategy() -> impl Strategy<Value = SortMode> {
    prop::sample::select(SortMode::all())
}

fn distinct_users(comments: &[Comment]) -> usize {
    comments
        .iter()
        .map(|c| c.username.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

proptest! {
    #[test]
    fn validation_is_idempotent(
        comments in prop::collection::vec(comment_strategy(), 0..30),
        settings in settings_strategy(),
        rules in prop::collection::vec(rule_strategy(), 0..4),
    ) {
        let first = validate_all(&comments, &settings, &rules);
        let second = validate_all(&comments, &settings, &rules);
        for comment in &comments {
            prop_assert_eq!(first.result(&comment.id), second.result(&comment.id));
        }
    }

    #[test]
    fn validation_covers_every_comment(
        comments in prop::collection::vec(comment_strategy(), 0..30),
        settings in settings_strategy(),
        rules in prop::collection::vec(rule_strategy(), 0..4),
    ) {
        let report = validate_all(&comments, &settings, &rules);
        prop_assert_eq!(report.len(), comments.len());
        for comment in &comments {
            let result = report.result(&comment.id);
            prop_assert!(result.is_some());
            let result = result.unwrap();
            prop_assert_eq!(result.is_valid, result.reason.is_none());
        }
    }

    #[test]
    fn draw_without_duplicates_has_distinct_users(
        comments in prop::collection::vec(comment_strategy(), 1..30),
        sort_mode in sort_strategy(),
        seed in any::<u64>(),
    ) {
        let available = distinct_users(&comments);
        let mut rng = seeded_rng(seed);
        let winners = draw(&comments, available, false, sort_mode, &mut rng).unwrap();

        let names: HashSet<String> = winners.iter().map(|w| w.username.to_lowercase()).collect();
        prop_assert_eq!(names.len(), winners.len());
        prop_assert_eq!(winners.len(), available);
    }

    #[test]
    fn draw_never_repeats_a_comment(
        comments in prop::collection::vec(comment_strategy(), 1..30),
        sort_mode in sort_strategy(),
        seed in any::<u64>(),
        k_seed in any::<prop::sample::Index>(),
    ) {
        let k = k_seed.index(comments.len()) + 1;
        let mut rng = seeded_rng(seed);
        let winners = draw(&comments, k, true, sort_mode, &mut rng).unwrap();

        prop_assert_eq!(winners.len(), k);
        let ids: HashSet<&str> = winners.iter().map(|w| w.comment_id.as_str()).collect();
        prop_assert_eq!(ids.len(), k);
        for (i, winner) in winners.iter().enumerate() {
            prop_assert_eq!(winner.position, i + 1);
        }
    }

    #[test]
    fn oversized_draw_leaves_winners_untouched(
        comments in prop::collection::vec(comment_strategy(), 1..20),
        extra in 1usize..5,
        seed in any::<u64>(),
    ) {
        let mut session = DrawSession::new();
        let mut rng = seeded_rng(seed);
        let before = session
            .draw_now(&comments, DrawOptions::default(), &mut rng)
            .unwrap()
            .to_vec();

        let options = DrawOptions {
            winners: distinct_users(&comments) + extra,
            ..Default::default()
        };
        prop_assert!(session.draw_now(&comments, options, &mut rng).is_err());
        prop_assert_eq!(session.winners(), before.as_slice());
    }

    #[test]
    fn export_round_trip_keeps_classification(
        comments in prop::collection::vec(comment_strategy(), 0..20),
        settings in settings_strategy(),
        rules in prop::collection::vec(rule_strategy(), 0..4),
    ) {
        let report = validate_all(&comments, &settings, &rules);
        let document = export(&settings, &rules, &comments, &report, &[], &ExportContext::default());
        let reloaded = ExportDocument::from_json(&document.to_json_pretty().unwrap()).unwrap();

        let revalidated = validate_all(
            &reloaded.into_comments(),
            &reloaded.settings.validation_settings(),
            &reloaded.settings.rules,
        );
        for exported in &reloaded.all_comments {
            prop_assert_eq!(revalidated.is_valid(&exported.id), exported.is_valid);
        }
    }
}
