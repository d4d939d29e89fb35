// ABOUTME: USDA FoodData Central client returning per-100 g reference foods for reconciliation
// ABOUTME: Implements food search, nutrient id mapping, and TTL caching of search results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! USDA `FoodData` Central API Client
//!
//! Search results already carry nutrient amounts per 100 g, so one request per
//! lookup is enough. Foods without an energy value in kcal are skipped since they
//! cannot be scored.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use async_trait::async_trait;
use nutriadapt_core::constants::reconciliation::MAX_CANDIDATE_LIMIT;
use nutriadapt_core::models::ReferenceFood;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::ReferenceSource;
use crate::config::ReferenceApiConfig;
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "USDA API";

/// Public demo key accepted by `FoodData` Central at a low request quota
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// `FoodData` Central nutrient numbers
mod nutrient_ids {
    pub const ENERGY_KCAL: u32 = 1008;
    pub const ENERGY_ATWATER_GENERAL: u32 = 2047;
    pub const ENERGY_ATWATER_SPECIFIC: u32 = 2048;
    pub const PROTEIN: u32 = 1003;
    pub const FAT: u32 = 1004;
    pub const CARBOHYDRATE: u32 = 1005;
    pub const FIBER: u32 = 1079;
}

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Cache TTL in seconds (default: 86400 = 24 hours)
    pub cache_ttl_secs: u64,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_owned(),
            base_url: crate::config::DEFAULT_REFERENCE_BASE_URL.to_owned(),
            cache_ttl_secs: 86_400,
        }
    }
}

impl From<&ReferenceApiConfig> for UsdaClientConfig {
    fn from(config: &ReferenceApiConfig) -> Self {
        Self {
            api_key: config
                .api_key
                .clone()
                .unwrap_or_else(|| DEMO_API_KEY.to_owned()),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            cache_ttl_secs: config.cache_ttl_secs,
        }
    }
}

/// USDA API search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: u64,
    description: String,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    nutrient_id: Option<u32>,
    #[serde(default)]
    unit_name: String,
    value: Option<f64>,
}

impl SearchFood {
    fn amount(&self, id: u32) -> Option<f64> {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_id == Some(id))
            .and_then(|n| n.value)
            .filter(|v| v.is_finite())
    }

    fn energy_kcal(&self) -> Option<f64> {
        [
            nutrient_ids::ENERGY_KCAL,
            nutrient_ids::ENERGY_ATWATER_GENERAL,
            nutrient_ids::ENERGY_ATWATER_SPECIFIC,
        ]
        .into_iter()
        .find_map(|id| {
            self.food_nutrients
                .iter()
                .find(|n| n.nutrient_id == Some(id) && n.unit_name.eq_ignore_ascii_case("kcal"))
                .and_then(|n| n.value)
                .filter(|v| v.is_finite())
        })
    }

    fn into_reference_food(self) -> Option<ReferenceFood> {
        let calories_per_100 = self.energy_kcal()?;
        Some(ReferenceFood {
            id: self.fdc_id.to_string(),
            protein_per_100: self.amount(nutrient_ids::PROTEIN).unwrap_or(0.0),
            carbs_per_100: self.amount(nutrient_ids::CARBOHYDRATE).unwrap_or(0.0),
            fat_per_100: self.amount(nutrient_ids::FAT).unwrap_or(0.0),
            fiber_per_100: self.amount(nutrient_ids::FIBER).unwrap_or(0.0),
            calories_per_100,
            description: self.description,
        })
    }
}

/// Convert a raw `foods/search` body into reference foods, preserving order
///
/// # Errors
///
/// Returns an external-service error when the body is not a search response
pub fn parse_search_response(body: &str) -> AppResult<Vec<ReferenceFood>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;
    Ok(response
        .foods
        .into_iter()
        .filter_map(SearchFood::into_reference_food)
        .collect())
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// USDA `FoodData` Central API Client
pub struct UsdaReferenceClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<Vec<ReferenceFood>>>>>,
}

impl UsdaReferenceClient {
    /// Create a new USDA API client
    #[must_use]
    pub fn new(config: UsdaClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            search_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Search for foods by query string
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for an empty query, a value-out-of-range
    /// error for a page size outside 1-200, and an external-service error when the
    /// request fails
    pub async fn search_foods(&self, query: &str, page_size: u32) -> AppResult<Vec<ReferenceFood>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }
        if page_size == 0 || page_size > MAX_CANDIDATE_LIMIT {
            return Err(AppError::out_of_range(format!(
                "Page size must be between 1 and {MAX_CANDIDATE_LIMIT}, got {page_size}"
            )));
        }

        let cache_key = format!("{}:{page_size}", query.to_lowercase());
        {
            let cache = self.search_cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if Instant::now() < entry.expires_at {
                    debug!(query, "USDA search served from cache");
                    return Ok(entry.data.clone());
                }
            }
        }

        let url = format!("{}/foods/search", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageSize", &page_size.to_string()),
                ("api_key", &self.config.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AppError::external_unavailable(SERVICE, e.to_string())
                } else {
                    AppError::external_service(SERVICE, e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;
        if !status.is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!("HTTP {status}: {body}"),
            ));
        }

        let foods = parse_search_response(&body)?;
        debug!(query, candidates = foods.len(), "USDA search completed");

        self.store_search(cache_key, foods.clone()).await;
        Ok(foods)
    }

    /// Cache a search result, evicting entries that have already expired
    async fn store_search(&self, cache_key: String, foods: Vec<ReferenceFood>) {
        let now = Instant::now();
        let mut cache = self.search_cache.write().await;
        cache.retain(|_, entry| entry.expires_at > now);
        cache.insert(
            cache_key,
            CacheEntry {
                data: foods,
                expires_at: now + Duration::from_secs(self.config.cache_ttl_secs),
            },
        );
    }

    /// Clear the search cache
    pub async fn clear_cache(&self) {
        self.search_cache.write().await.clear();
    }

    /// Number of cached searches
    pub async fn cache_len(&self) -> usize {
        self.search_cache.read().await.len()
    }
}

#[async_trait]
impl ReferenceSource for UsdaReferenceClient {
    async fn search(&self, name: &str, limit: u32) -> AppResult<Vec<ReferenceFood>> {
        self.search_foods(name, limit).await
    }

    fn source_name(&self) -> &'static str {
        "usda_fdc"
    }
}
