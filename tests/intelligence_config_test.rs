// ABOUTME: Integration tests for environment-driven configuration loading
// ABOUTME: Verifies NUTRIADAPT_* overrides, validation failures, and runtime settings parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use nutriadapt::config::{DatabaseUrl, ServerConfig};
use nutriadapt::errors::ErrorCode;
use nutriadapt_intelligence::config::STOPWORDS_ENV_VAR;
use nutriadapt_intelligence::{ConfigError, IntelligenceConfig};
use serial_test::serial;

const TOUCHED_VARS: &[&str] = &[
    "NUTRIADAPT_ADAPT_CEILING",
    "NUTRIADAPT_NAME_WEIGHT",
    "NUTRIADAPT_CANDIDATE_LIMIT",
    "NUTRIADAPT_CALORIE_FLOOR",
    STOPWORDS_ENV_VAR,
    "DATABASE_URL",
    "REFERENCE_CANDIDATE_LIMIT",
    "REFERENCE_LOOKUP_TIMEOUT_MS",
];

fn clear_env() {
    for var in TOUCHED_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_load_without_overrides() {
    clear_env();
    let config = IntelligenceConfig::load().unwrap();
    assert_eq!(config, IntelligenceConfig::default());
}

#[test]
#[serial]
fn test_numeric_override_applies() {
    clear_env();
    env::set_var("NUTRIADAPT_ADAPT_CEILING", "0.2");
    env::set_var("NUTRIADAPT_CALORIE_FLOOR", " 1500 ");
    let config = IntelligenceConfig::load();
    clear_env();

    let config = config.unwrap();
    assert!((config.metabolic.adapt_ceiling - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.metabolic.calorie_floor, 1500);
}

#[test]
#[serial]
fn test_unparseable_override_is_rejected() {
    clear_env();
    env::set_var("NUTRIADAPT_CANDIDATE_LIMIT", "ten");
    let result = IntelligenceConfig::load();
    clear_env();

    match result {
        Err(ConfigError::Parse(message)) => assert!(message.contains("NUTRIADAPT_CANDIDATE_LIMIT")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_override_that_breaks_validation_is_rejected() {
    clear_env();
    env::set_var("NUTRIADAPT_NAME_WEIGHT", "0.9");
    let result = IntelligenceConfig::load();
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidWeights(_))));
}

#[test]
#[serial]
fn test_stopword_list_override() {
    clear_env();
    env::set_var(STOPWORDS_ENV_VAR, "Raw, cooked,,  with ");
    let config = IntelligenceConfig::load();
    clear_env();

    assert_eq!(
        config.unwrap().reconciliation.qualifier_stopwords,
        vec!["raw".to_owned(), "cooked".to_owned(), "with".to_owned()]
    );
}

#[test]
#[serial]
fn test_server_config_reads_database_and_reference_settings() {
    clear_env();
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("REFERENCE_LOOKUP_TIMEOUT_MS", "750");
    let config = ServerConfig::from_env();
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.database_url, DatabaseUrl::Memory);
    assert_eq!(config.reference.lookup_timeout_ms, 750);
}

#[test]
#[serial]
fn test_server_config_rejects_bad_values() {
    clear_env();
    env::set_var("REFERENCE_CANDIDATE_LIMIT", "0");
    let zero_limit = ServerConfig::from_env();
    clear_env();
    assert_eq!(zero_limit.unwrap_err().code, ErrorCode::ConfigInvalid);

    env::set_var("REFERENCE_CANDIDATE_LIMIT", "many");
    let unparseable_limit = ServerConfig::from_env();
    clear_env();
    assert_eq!(unparseable_limit.unwrap_err().code, ErrorCode::ConfigError);

    env::set_var("DATABASE_URL", "postgres://localhost/nutri");
    let bad_url = ServerConfig::from_env();
    clear_env();
    assert_eq!(bad_url.unwrap_err().code, ErrorCode::ConfigError);

    env::set_var("NUTRIADAPT_ADAPT_CEILING", "1.5");
    let bad_engine = ServerConfig::from_env();
    clear_env();
    assert_eq!(bad_engine.unwrap_err().code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_reference_candidate_limit_sets_reconciliation_limit() {
    clear_env();
    env::set_var("REFERENCE_CANDIDATE_LIMIT", "25");
    let config = ServerConfig::from_env();
    clear_env();

    assert_eq!(config.unwrap().intelligence.reconciliation.candidate_limit, 25);
}

#[test]
#[serial]
fn test_candidate_limit_above_search_page_size_is_rejected() {
    clear_env();
    env::set_var("NUTRIADAPT_CANDIDATE_LIMIT", "201");
    let result = IntelligenceConfig::load();
    clear_env();

    assert!(matches!(result, Err(ConfigError::ValueOutOfRange(_))));
}
