//! Configuration loading tests

use giveaway_picker::config::Config;
use giveaway_picker::models::{RuleOperator, RuleType, SortMode};
use serial_test::serial;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const PICKER_VARS: &[&str] = &[
    "PICKER_SORT_MODE",
    "PICKER_MIN_COMMENT_LENGTH",
    "PICKER_REQUIRE_MENTIONS",
    "PICKER_MIN_MENTIONS",
    "PICKER_WINNERS",
    "PICKER_ALLOW_DUPLICATE_USERS",
    "PICKER_FILTER_SPAM",
    "PICKER_MAX_COMMENTS",
    "PICKER_RATE_LIMIT",
    "PICKER_LOG_FORMAT",
    "INSTAGRAM_ACCESS_TOKEN",
];

fn clear_env() {
    for key in PICKER_VARS {
        std::env::remove_var(key);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_sample_config_parses() {
    clear_env();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    let config = Config::from_file(&path).unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.picker.winners, 3);
    assert_eq!(config.picker.validation.min_mentions, 2);
    assert!(config.picker.validation.require_mentions);
    assert!(config.collector.filter_spam);

    assert_eq!(config.picker.rules.len(), 2);
    assert_eq!(config.picker.rules[0].rule_type, RuleType::Exclude);
    assert!(config.picker.rules[0].enabled);
    assert_eq!(config.picker.rules[1].operator, RuleOperator::Regex);
    assert!(!config.picker.rules[1].enabled);
    assert_ne!(config.picker.rules[0].id, config.picker.rules[1].id);

    assert!(config.graph.access_token.is_none());
}

#[test]
#[serial]
fn test_file_token_falls_back_to_env() {
    clear_env();
    std::env::set_var("INSTAGRAM_ACCESS_TOKEN", "env-token");

    let file = write_config("[picker]\nwinners = 2\n");
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.graph.access_token.as_deref(), Some("env-token"));

    let file = write_config("[graph]\naccess_token = \"file-token\"\n");
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.graph.access_token.as_deref(), Some("file-token"));

    clear_env();
}

#[test]
#[serial]
fn test_from_env() {
    clear_env();
    std::env::set_var("PICKER_SORT_MODE", "likes");
    std::env::set_var("PICKER_WINNERS", "5");
    std::env::set_var("PICKER_REQUIRE_MENTIONS", "yes");
    std::env::set_var("PICKER_MIN_MENTIONS", "3");
    std::env::set_var("PICKER_MAX_COMMENTS", "not-a-number");

    let config = Config::from_env().unwrap();
    assert_eq!(config.picker.sort_mode, SortMode::Likes);
    assert_eq!(config.picker.winners, 5);
    assert!(config.picker.validation.require_mentions);
    assert_eq!(config.picker.validation.min_mentions, 3);
    assert_eq!(config.collector.max_comments, 0);
    assert!(config.picker.rules.is_empty());

    clear_env();
}

#[test]
#[serial]
fn test_from_env_rejects_unknown_sort_mode() {
    clear_env();
    std::env::set_var("PICKER_SORT_MODE", "loudest");
    assert!(Config::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_load_prefers_file() {
    clear_env();
    std::env::set_var("PICKER_WINNERS", "9");

    let file = write_config("[picker]\nwinners = 2\n");
    assert_eq!(Config::load(Some(file.path())).unwrap().picker.winners, 2);
    assert_eq!(Config::load(None).unwrap().picker.winners, 9);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_files() {
    clear_env();
    assert!(Config::from_file(Path::new("/nonexistent/giveaway.toml")).is_err());

    let file = write_config("[picker\nwinners = ");
    assert!(Config::from_file(file.path()).is_err());

    let file = write_config("[picker]\nwinners = 0\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}
