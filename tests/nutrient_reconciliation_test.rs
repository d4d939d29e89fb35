// ABOUTME: Integration tests for nutrient reconciliation through reference sources
// ABOUTME: Covers verified, blended, and AI-only tiers plus lookup timeout and failure fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nutriadapt::errors::{AppError, AppResult, ErrorCode};
use nutriadapt::external::{
    InMemoryReferenceSource, ReferenceSource, UsdaClientConfig, UsdaReferenceClient,
};
use nutriadapt::models::{NutrientEstimate, NutrientSource, ReferenceFood};
use nutriadapt::services::{NutrientReconciliationService, ReconciliationRequest};
use nutriadapt_intelligence::ReconciliationConfig;

const LOOKUP_TIMEOUT: Duration = Duration::from_millis(200);

fn raw_banana() -> ReferenceFood {
    ReferenceFood {
        id: "fdc-banana".into(),
        description: "Banana, raw".into(),
        calories_per_100: 105.0,
        protein_per_100: 1.3,
        carbs_per_100: 27.0,
        fat_per_100: 0.4,
        fiber_per_100: 3.1,
    }
}

fn request(name: &str, calories: f64, portion_grams: Option<f64>) -> ReconciliationRequest {
    ReconciliationRequest {
        estimate: NutrientEstimate {
            name: name.into(),
            calories,
            protein_g: 2.0,
            carbs_g: 25.0,
            fat_g: 1.0,
            fiber_g: 2.5,
            confidence: 0.5,
        },
        portion_grams,
    }
}

fn service(source: Arc<dyn ReferenceSource>) -> NutrientReconciliationService {
    common::init_test_logging();
    NutrientReconciliationService::new(source, ReconciliationConfig::default(), LOOKUP_TIMEOUT)
}

fn banana_service() -> NutrientReconciliationService {
    service(Arc::new(InMemoryReferenceSource::from_foods(vec![raw_banana()])))
}

/// Never answers within the lookup timeout
struct SlowSource;

#[async_trait]
impl ReferenceSource for SlowSource {
    async fn search(&self, _name: &str, _limit: u32) -> AppResult<Vec<ReferenceFood>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![raw_banana()])
    }

    fn source_name(&self) -> &'static str {
        "slow"
    }
}

/// Always errors
struct FailingSource;

#[async_trait]
impl ReferenceSource for FailingSource {
    async fn search(&self, _name: &str, _limit: u32) -> AppResult<Vec<ReferenceFood>> {
        Err(AppError::external_service("test source", "HTTP 503"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// Counts lookups, remembers the requested limit, and returns a fixed candidate list
struct CountingSource {
    calls: AtomicUsize,
    last_limit: AtomicU32,
    foods: Vec<ReferenceFood>,
}

impl CountingSource {
    fn new(foods: Vec<ReferenceFood>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_limit: AtomicU32::new(0),
            foods,
        })
    }
}

#[async_trait]
impl ReferenceSource for CountingSource {
    async fn search(&self, _name: &str, limit: u32) -> AppResult<Vec<ReferenceFood>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        Ok(self.foods.clone())
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test]
async fn test_banana_is_verified_at_reference_calories() {
    let result = banana_service()
        .reconcile(&request("banana", 110.0, None))
        .await
        .unwrap();

    assert_eq!(result.source, NutrientSource::Verified);
    assert!((result.calories - 105.0).abs() < 1e-9);
    assert!((result.carbs_g - 27.0).abs() < 1e-9);
    assert_eq!(result.matched_reference_id.as_deref(), Some("fdc-banana"));
    let m = result.match_confidence.unwrap();
    assert!((m - 0.9545).abs() < 1e-3);
    assert!((result.confidence - m).abs() < f64::EPSILON);
    assert!(result.blend_ratio.is_none());
}

#[tokio::test]
async fn test_verified_values_scale_to_portion() {
    let result = banana_service()
        .reconcile(&request("banana", 126.0, Some(120.0)))
        .await
        .unwrap();

    assert_eq!(result.source, NutrientSource::Verified);
    assert!((result.calories - 126.0).abs() < 1e-9);
    assert!((result.fiber_g - 3.72).abs() < 1e-9);
}

#[tokio::test]
async fn test_partial_name_match_blends() {
    let result = banana_service()
        .reconcile(&request("banana bread", 110.0, None))
        .await
        .unwrap();

    assert_eq!(result.source, NutrientSource::Blended);
    let m = result.blend_ratio.unwrap();
    assert!((0.6..=0.8).contains(&m));
    let expected = 110.0f64.mul_add(1.0 - m, 105.0 * m);
    assert!((result.calories - expected).abs() < 1e-9);
    assert!(result.calories < 110.0 && result.calories > 105.0);
    assert!((result.confidence - 0.75).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unknown_food_stays_ai_only() {
    let service = service(Arc::new(InMemoryReferenceSource::with_common_foods()));
    let req = request("mystery stew", 400.0, None);
    let result = service.reconcile(&req).await.unwrap();

    assert_eq!(result.source, NutrientSource::AiOnly);
    assert!((result.calories - 400.0).abs() < f64::EPSILON);
    assert!((result.protein_g - req.estimate.protein_g).abs() < f64::EPSILON);
    assert!((result.confidence - 0.5).abs() < f64::EPSILON);
    assert!(result.matched_reference_id.is_none());
}

#[tokio::test]
async fn test_lookup_timeout_falls_back_to_ai_only() {
    let req = request("mystery stew", 400.0, None);
    let expected = service(Arc::new(InMemoryReferenceSource::new()))
        .reconcile(&req)
        .await
        .unwrap();

    let started = std::time::Instant::now();
    let result = service(Arc::new(SlowSource)).reconcile(&req).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(result, expected);
}

#[tokio::test]
async fn test_lookup_error_falls_back_to_ai_only() {
    let result = service(Arc::new(FailingSource))
        .reconcile(&request("banana", 110.0, None))
        .await
        .unwrap();

    assert_eq!(result.source, NutrientSource::AiOnly);
    assert!((result.calories - 110.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unreachable_usda_falls_back_to_ai_only() {
    let client = UsdaReferenceClient::new(UsdaClientConfig {
        base_url: "http://127.0.0.1:9".into(),
        ..UsdaClientConfig::default()
    });
    let result = service(Arc::new(client))
        .reconcile(&request("banana", 110.0, None))
        .await
        .unwrap();

    assert_eq!(result.source, NutrientSource::AiOnly);
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_lookup() {
    let source = CountingSource::new(vec![raw_banana()]);
    let service = service(source.clone());

    let err = service.reconcile(&request("  ", 110.0, None)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = service.reconcile(&request("banana", 0.0, None)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DataQuality);
    let err = service.reconcile(&request("banana", -20.0, None)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = service
        .reconcile(&request("banana", 110.0, Some(0.0)))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_only_top_candidates_are_scored() {
    let mut foods: Vec<ReferenceFood> = (0..15)
        .map(|i| ReferenceFood {
            id: format!("filler-{i}"),
            description: format!("Snack mix {i}"),
            calories_per_100: 110.0,
            protein_per_100: 0.0,
            carbs_per_100: 0.0,
            fat_per_100: 0.0,
            fiber_per_100: 0.0,
        })
        .collect();
    foods.push(raw_banana());
    let source = CountingSource::new(foods);

    let result = service(source.clone())
        .reconcile(&request("banana", 110.0, None))
        .await
        .unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.last_limit.load(Ordering::SeqCst), 10);
    assert_eq!(result.source, NutrientSource::AiOnly);
    assert_ne!(result.matched_reference_id.as_deref(), Some("fdc-banana"));
}

#[tokio::test]
async fn test_configured_candidate_limit_reaches_source() {
    common::init_test_logging();
    let source = CountingSource::new(vec![raw_banana()]);
    let config = ReconciliationConfig {
        candidate_limit: 3,
        ..ReconciliationConfig::default()
    };
    let service = NutrientReconciliationService::new(source.clone(), config, LOOKUP_TIMEOUT);

    service.reconcile(&request("banana", 110.0, None)).await.unwrap();
    assert_eq!(source.last_limit.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_reconciliation_is_repeatable() {
    let service = banana_service();
    let req = request("banana bread", 110.0, None);
    let first = service.reconcile(&req).await.unwrap();
    let second = service.reconcile(&req).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_dataset_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foods.json");
    std::fs::write(&path, serde_json::to_string(&[raw_banana()]).unwrap()).unwrap();

    let source = InMemoryReferenceSource::from_json_file(&path).await.unwrap();
    assert_eq!(source.len().await, 1);
    let result = service(Arc::new(source))
        .reconcile(&request("banana", 110.0, None))
        .await
        .unwrap();
    assert_eq!(result.source, NutrientSource::Verified);
}
