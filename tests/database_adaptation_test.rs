// ABOUTME: Integration tests for stored adaptation checks and the idempotent apply step
// ABOUTME: Exercises SQLite profiles, samples, event log, weekly checks, and batch runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use nutriadapt::config::DatabaseUrl;
use nutriadapt::database::Database;
use nutriadapt::errors::ErrorCode;
use nutriadapt::models::{AdaptationType, ApplyOutcome, IntakeSample, WeightSample};
use nutriadapt::services::AdaptationService;
use nutriadapt_intelligence::MetabolicConfig;
use uuid::Uuid;

async fn service() -> (Database, AdaptationService) {
    let database = common::create_test_database().await;
    let service = AdaptationService::new(database.clone(), MetabolicConfig::default()).unwrap();
    (database, service)
}

#[tokio::test]
async fn test_weekly_check_records_event_without_touching_target() {
    let (database, service) = service().await;
    let user_id = Uuid::new_v4();
    common::seed_user(&database, user_id, 1800, &common::stall_series()).await;

    let assessment = service.run_weekly_check(user_id, Utc::now()).await.unwrap();
    let event = assessment.event.unwrap();
    assert_eq!(event.adaptation_type, AdaptationType::DeficitStall);
    assert_eq!(event.new_calories, 1350);

    let stored = database.list_adaptation_events(user_id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, event.id);
    assert_eq!(stored[0].week_start_date, event.week_start_date);

    let profile = database.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.daily_calories, 1800);
    assert!(!profile.has_applied(event.id));
}

#[tokio::test]
async fn test_apply_is_idempotent() {
    let (database, service) = service().await;
    let user_id = Uuid::new_v4();
    common::seed_user(&database, user_id, 1800, &common::stall_series()).await;
    let event = service
        .run_weekly_check(user_id, Utc::now())
        .await
        .unwrap()
        .event
        .unwrap();

    let first = service.apply_event(event.id).await.unwrap();
    assert_eq!(
        first,
        ApplyOutcome::Applied {
            previous_calories: 1800,
            daily_calories: 1350
        }
    );

    let second = service.apply_event(event.id).await.unwrap();
    assert_eq!(second, ApplyOutcome::AlreadyApplied { daily_calories: 1350 });

    let profile = database.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.daily_calories, 1350);
    assert!(profile.has_applied(event.id));
}

#[tokio::test]
async fn test_redelivered_apply_keeps_manual_edit() {
    let (database, service) = service().await;
    let user_id = Uuid::new_v4();
    common::seed_user(&database, user_id, 1800, &common::stall_series()).await;
    let event = service
        .run_weekly_check(user_id, Utc::now())
        .await
        .unwrap()
        .event
        .unwrap();

    service.apply_event(event.id).await.unwrap();
    database.upsert_profile(user_id, 1500).await.unwrap();

    let outcome = service.apply_event(event.id).await.unwrap();
    assert_eq!(outcome, ApplyOutcome::AlreadyApplied { daily_calories: 1500 });
    let profile = database.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.daily_calories, 1500);
}

#[tokio::test]
async fn test_rerun_for_same_week_keeps_one_event() {
    let (database, service) = service().await;
    let user_id = Uuid::new_v4();
    common::seed_user(&database, user_id, 1800, &common::stall_series()).await;

    let first = service
        .run_weekly_check(user_id, Utc::now())
        .await
        .unwrap()
        .event
        .unwrap();
    let second = service
        .run_weekly_check(user_id, Utc::now() + Duration::hours(1))
        .await
        .unwrap()
        .event
        .unwrap();

    assert_eq!(second.id, first.id);
    let stored = database.list_adaptation_events(user_id).await.unwrap();
    assert_eq!(stored.len(), 1);

    service.apply_event(first.id).await.unwrap();
    let report = service.run_weekly_batch(Utc::now()).await.unwrap();
    let rerun = report.entries[0].assessment.as_ref().unwrap();
    assert_eq!(rerun.event.as_ref().unwrap().id, first.id);
    assert_eq!(database.list_adaptation_events(user_id).await.unwrap().len(), 1);
    let profile = database.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.daily_calories, 1350);
}

#[tokio::test]
async fn test_apply_unknown_event_is_not_found() {
    let (_database, service) = service().await;
    let err = service.apply_event(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_check_without_profile_is_not_found() {
    let (_database, service) = service().await;
    let err = service
        .run_weekly_check(Uuid::new_v4(), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_flat_user_records_nothing() {
    let (database, service) = service().await;
    let user_id = Uuid::new_v4();
    common::seed_user(&database, user_id, 1800, &common::flat_series()).await;

    let assessment = service.run_weekly_check(user_id, Utc::now()).await.unwrap();
    assert!(assessment.event.is_none());
    assert!(database.list_adaptation_events(user_id).await.unwrap().is_empty());
    let profile = database.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.daily_calories, 1800);
}

#[tokio::test]
async fn test_batch_reports_each_profile() {
    let (database, service) = service().await;
    let stalled = Uuid::new_v4();
    let flat = Uuid::new_v4();
    let empty = Uuid::new_v4();
    common::seed_user(&database, stalled, 1800, &common::stall_series()).await;
    common::seed_user(&database, flat, 2200, &common::flat_series()).await;
    database.upsert_profile(empty, 2000).await.unwrap();

    let report = service.run_weekly_batch(Utc::now()).await.unwrap();
    assert_eq!(report.checked, 3);
    assert_eq!(report.adapted, 1);
    assert_eq!(report.failed, 1);

    let failed = report.entries.iter().find(|e| e.user_id == empty).unwrap();
    assert!(failed.error.is_some());
    assert_eq!(database.list_adaptation_events(stalled).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_weight_corrections_are_returned_in_recording_order() {
    let database = common::create_test_database().await;
    let user_id = Uuid::new_v4();
    let date = common::day(0);
    let t0 = Utc::now();

    database
        .record_weight(user_id, &WeightSample::new(date, 181.0), t0)
        .await
        .unwrap();
    database
        .record_weight(user_id, &WeightSample::new(date, 180.2), t0 + Duration::minutes(5))
        .await
        .unwrap();
    database
        .record_weight(user_id, &WeightSample::missing(common::day(1)), t0)
        .await
        .unwrap();

    let series = database.weight_series(user_id).await.unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[1].weight, Some(180.2));
    assert_eq!(series[2].weight, None);
}

#[tokio::test]
async fn test_intake_is_one_total_per_day() {
    let database = common::create_test_database().await;
    let user_id = Uuid::new_v4();
    let date = common::day(0);

    for calories in [1500.0, 1900.0] {
        database
            .record_intake(user_id, &IntakeSample::new(date, calories), Utc::now())
            .await
            .unwrap();
    }

    let series = database.intake_series(user_id).await.unwrap();
    assert_eq!(series.len(), 1);
    assert!((series[0].calories_in - 1900.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_invalid_samples_and_targets_rejected() {
    let database = common::create_test_database().await;
    let user_id = Uuid::new_v4();

    let err = database.upsert_profile(user_id, 0).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = database
        .record_weight(user_id, &WeightSample::new(common::day(0), -5.0), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = database
        .record_intake(user_id, &IntakeSample::new(common::day(0), f64::NAN), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nutriadapt.db"),
    };
    let user_id = Uuid::new_v4();

    {
        let database = Database::new(&url).await.unwrap();
        database.upsert_profile(user_id, 2100).await.unwrap();
    }

    let reopened = Database::new(&url).await.unwrap();
    assert_eq!(reopened.list_profile_user_ids().await.unwrap(), vec![user_id]);
}
