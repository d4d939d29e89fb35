// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory databases, and weight/intake series builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `nutriadapt`

use std::sync::Once;

use chrono::{Days, NaiveDate, Utc};
use nutriadapt::config::DatabaseUrl;
use nutriadapt::database::Database;
use nutriadapt::models::{IntakeSample, WeightSample};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory).await.unwrap()
}

/// First day of every generated series
pub fn day0() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// `day0() + offset`
pub fn day(offset: usize) -> NaiveDate {
    day0() + Days::new(offset as u64)
}

/// Daily weigh-ins from a raw-weight function
pub fn weights(len: usize, weight: impl Fn(usize) -> f64) -> Vec<WeightSample> {
    (0..len).map(|i| WeightSample::new(day(i), weight(i))).collect()
}

/// Daily intake totals from an intake function
pub fn intakes(len: usize, calories: impl Fn(usize) -> f64) -> Vec<IntakeSample> {
    (0..len).map(|i| IntakeSample::new(day(i), calories(i))).collect()
}

/// 28 days at 180 lb eating 1800 kcal
pub fn flat_series() -> (Vec<WeightSample>, Vec<IntakeSample>) {
    (weights(28, |_| 180.0), intakes(28, |_| 1800.0))
}

/// 28 days losing 0.3 lb/day for two weeks, then holding, on a flat 1800 kcal
///
/// After smoothing the early window loses about 0.19 lb/day and the recent window
/// about 0.09 lb/day, which classifies as a deficit stall clamped to 0.25.
pub fn stall_series() -> (Vec<WeightSample>, Vec<IntakeSample>) {
    (
        weights(28, |i| 0.3f64.mul_add(-(i.min(14) as f64), 180.0)),
        intakes(28, |_| 1800.0),
    )
}

/// Store a profile and its samples
pub async fn seed_user(
    database: &Database,
    user_id: Uuid,
    daily_calories: i32,
    series: &(Vec<WeightSample>, Vec<IntakeSample>),
) {
    database.upsert_profile(user_id, daily_calories).await.unwrap();
    let recorded_at = Utc::now();
    for sample in &series.0 {
        database.record_weight(user_id, sample, recorded_at).await.unwrap();
    }
    for sample in &series.1 {
        database.record_intake(user_id, sample, recorded_at).await.unwrap();
    }
}
