// ABOUTME: In-memory reference food dataset for offline reconciliation and tests
// ABOUTME: Ships a small seeded table of common foods and can load more from a JSON file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use nutriadapt_core::constants::reconciliation::QUALIFIER_STOPWORDS;
use nutriadapt_core::models::ReferenceFood;
use nutriadapt_intelligence::nutrition::{jaccard, tokenize};
use tokio::sync::RwLock;
use tracing::info;

use super::ReferenceSource;
use crate::errors::{AppError, AppResult};

/// Reference source backed by a vector of foods
///
/// Search ranks foods by token overlap with the query and drops foods that share
/// no token with it.
#[derive(Clone, Default)]
pub struct InMemoryReferenceSource {
    foods: Arc<RwLock<Vec<ReferenceFood>>>,
    stopwords: Vec<String>,
}

impl InMemoryReferenceSource {
    /// Empty dataset
    #[must_use]
    pub fn new() -> Self {
        Self::from_foods(Vec::new())
    }

    /// Dataset holding `foods`
    #[must_use]
    pub fn from_foods(foods: Vec<ReferenceFood>) -> Self {
        Self {
            foods: Arc::new(RwLock::new(foods)),
            stopwords: QUALIFIER_STOPWORDS.iter().map(|&s| s.to_owned()).collect(),
        }
    }

    /// Same dataset using `stopwords` when tokenizing queries and descriptions
    #[must_use]
    pub fn with_stopwords(mut self, stopwords: Vec<String>) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Dataset seeded with common whole foods (USDA SR Legacy values)
    #[must_use]
    pub fn with_common_foods() -> Self {
        Self::from_foods(common_foods())
    }

    /// Load a JSON array of reference foods
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a list of foods
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::invalid_input(format!(
                "Cannot read reference dataset {}: {e}",
                path.display()
            ))
        })?;
        let foods: Vec<ReferenceFood> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), foods = foods.len(), "Loaded reference dataset");
        Ok(Self::from_foods(foods))
    }

    /// Add or replace a food by id
    pub async fn insert(&self, food: ReferenceFood) {
        let mut foods = self.foods.write().await;
        if let Some(existing) = foods.iter_mut().find(|f| f.id == food.id) {
            *existing = food;
        } else {
            foods.push(food);
        }
    }

    /// Number of foods in the dataset
    pub async fn len(&self) -> usize {
        self.foods.read().await.len()
    }

    /// Whether the dataset is empty
    pub async fn is_empty(&self) -> bool {
        self.foods.read().await.is_empty()
    }
}

#[async_trait]
impl ReferenceSource for InMemoryReferenceSource {
    async fn search(&self, name: &str, limit: u32) -> AppResult<Vec<ReferenceFood>> {
        let query = tokenize(name, &self.stopwords);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let foods = self.foods.read().await;
        let mut hits: Vec<(f64, &ReferenceFood)> = foods
            .iter()
            .map(|food| (jaccard(&query, &tokenize(&food.description, &self.stopwords)), food))
            .filter(|(overlap, _)| *overlap > 0.0)
            .collect();
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(hits
            .into_iter()
            .take(limit as usize)
            .map(|(_, food)| food.clone())
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "in_memory"
    }
}

fn food(id: &str, description: &str, per_100: [f64; 5]) -> ReferenceFood {
    let [calories, protein, carbs, fat, fiber] = per_100;
    ReferenceFood {
        id: id.to_owned(),
        description: description.to_owned(),
        calories_per_100: calories,
        protein_per_100: protein,
        carbs_per_100: carbs,
        fat_per_100: fat,
        fiber_per_100: fiber,
    }
}

fn common_foods() -> Vec<ReferenceFood> {
    vec![
        food("173944", "Banana, raw", [89.0, 1.09, 22.84, 0.33, 2.6]),
        food("171688", "Apple, raw, with skin", [52.0, 0.26, 13.81, 0.17, 2.4]),
        food("169097", "Orange, raw", [47.0, 0.94, 11.75, 0.12, 2.4]),
        food("171477", "Chicken breast, roasted", [165.0, 31.02, 0.0, 3.57, 0.0]),
        food("168878", "Rice, white, cooked", [130.0, 2.69, 28.17, 0.28, 0.4]),
        food("169704", "Rice, brown, cooked", [123.0, 2.74, 25.58, 0.97, 1.6]),
        food("173424", "Oats, rolled, dry", [379.0, 13.15, 67.7, 6.52, 10.1]),
        food("171287", "Egg, whole, cooked, hard-boiled", [155.0, 12.58, 1.12, 10.61, 0.0]),
        food("170903", "Broccoli, raw", [34.0, 2.82, 6.64, 0.37, 2.6]),
        food("170567", "Almonds, raw", [579.0, 21.15, 21.55, 49.93, 12.5]),
        food("173410", "Salmon, Atlantic, cooked", [206.0, 22.1, 0.0, 12.35, 0.0]),
        food("170285", "Potato, baked, flesh and skin", [93.0, 2.5, 21.15, 0.13, 2.2]),
        food("171284", "Greek yogurt, plain, nonfat", [59.0, 10.19, 3.6, 0.39, 0.0]),
        food("172421", "Bread, whole wheat", [252.0, 12.45, 42.71, 3.5, 6.0]),
        food("170148", "Avocado, raw", [160.0, 2.0, 8.53, 14.66, 6.7]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_ranks_by_overlap() {
        let source = InMemoryReferenceSource::with_common_foods();
        let hits = source.search("cooked white rice", 3).await.unwrap();
        assert_eq!(hits[0].id, "168878");
        assert!(hits.len() <= 3);
    }

    #[tokio::test]
    async fn test_search_without_overlap_is_empty() {
        let source = InMemoryReferenceSource::with_common_foods();
        assert!(source.search("protein shake", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_configured_stopwords_shape_retrieval() {
        let default_words = InMemoryReferenceSource::with_common_foods();
        assert!(!default_words.search("cooked beans", 5).await.unwrap().is_empty());

        let custom = InMemoryReferenceSource::with_common_foods().with_stopwords(vec!["cooked".into()]);
        assert!(custom.search("cooked beans", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_replaces_by_id() {
        let source = InMemoryReferenceSource::new();
        source.insert(food("1", "Tofu, firm", [144.0, 15.0, 3.0, 8.0, 2.0])).await;
        source.insert(food("1", "Tofu, firm", [145.0, 17.0, 3.0, 9.0, 2.0])).await;
        assert_eq!(source.len().await, 1);
        let hits = source.search("tofu", 1).await.unwrap();
        assert!((hits[0].calories_per_100 - 145.0).abs() < f64::EPSILON);
    }
}
