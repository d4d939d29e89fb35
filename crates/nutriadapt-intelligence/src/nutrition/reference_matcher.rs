// ABOUTME: Scores reference food candidates against an AI estimate and ranks them
// ABOUTME: Weighted name and calorie similarity; ties prefer the numerically plausible candidate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Reference Matcher
//!
//! The external source's own ranking is not trusted: every candidate is rescored
//! with `match_confidence = name_weight * name_similarity + calorie_weight *
//! calorie_similarity`, using reference calories scaled to the caller's portion.

use std::cmp::Ordering;

use nutriadapt_core::errors::{AppError, AppResult};
use nutriadapt_core::models::ReferenceFood;
use serde::{Deserialize, Serialize};

use super::similarity::{calorie_similarity, name_similarity};
use crate::config::ReconciliationConfig;

/// One reference candidate with its component scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Candidate as returned by the reference source
    pub food: ReferenceFood,
    /// Token Jaccard similarity of the names
    pub name_similarity: f64,
    /// Plausibility of the candidate's calories for the portion
    pub calorie_similarity: f64,
    /// Weighted combination in [0, 1]
    pub match_confidence: f64,
}

/// Check that an AI calorie value can anchor calorie similarity
///
/// # Errors
///
/// Returns an invalid-input error for negative or non-finite calories and a
/// data-quality error for exactly zero, since a zero-calorie estimate for a real
/// food signals an upstream bug
pub fn validate_ai_calories(ai_calories: f64) -> AppResult<()> {
    if !ai_calories.is_finite() || ai_calories < 0.0 {
        return Err(AppError::invalid_input(format!(
            "AI calorie estimate must be a positive number, got {ai_calories}"
        )));
    }
    if ai_calories == 0.0 {
        return Err(AppError::data_quality(
            "AI estimate reported 0 kcal; calorie similarity is undefined",
        ));
    }
    Ok(())
}

/// Reference candidate scorer
#[derive(Debug, Clone, Default)]
pub struct ReferenceMatcher {
    config: ReconciliationConfig,
}

impl ReferenceMatcher {
    /// Matcher using validated reconciliation settings
    #[must_use]
    pub const fn new(config: ReconciliationConfig) -> Self {
        Self { config }
    }

    /// Settings in use
    #[must_use]
    pub const fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Score one candidate; `ai_calories` must already be validated
    #[must_use]
    pub fn score(
        &self,
        ai_name: &str,
        ai_calories: f64,
        portion_grams: f64,
        candidate: &ReferenceFood,
    ) -> ScoredCandidate {
        let name_sim = name_similarity(
            ai_name,
            &candidate.description,
            &self.config.qualifier_stopwords,
        );
        let reference_calories = candidate.for_portion(portion_grams).calories;
        let calorie_sim = if reference_calories.is_finite() {
            calorie_similarity(ai_calories, reference_calories, self.config.calorie_tolerance)
        } else {
            0.0
        };
        let match_confidence = self
            .config
            .name_weight
            .mul_add(name_sim, self.config.calorie_weight * calorie_sim)
            .clamp(0.0, 1.0);

        ScoredCandidate {
            food: candidate.clone(),
            name_similarity: name_sim,
            calorie_similarity: calorie_sim,
            match_confidence,
        }
    }

    /// Score every candidate and sort best first
    ///
    /// # Errors
    ///
    /// Returns the error of [`validate_ai_calories`] for an unusable calorie value
    pub fn rank(
        &self,
        ai_name: &str,
        ai_calories: f64,
        portion_grams: f64,
        candidates: &[ReferenceFood],
    ) -> AppResult<Vec<ScoredCandidate>> {
        validate_ai_calories(ai_calories)?;
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| self.score(ai_name, ai_calories, portion_grams, candidate))
            .collect();
        scored.sort_by(compare_best_first);
        Ok(scored)
    }

    /// The single best candidate, if any
    ///
    /// # Errors
    ///
    /// Returns the error of [`validate_ai_calories`] for an unusable calorie value
    pub fn best(
        &self,
        ai_name: &str,
        ai_calories: f64,
        portion_grams: f64,
        candidates: &[ReferenceFood],
    ) -> AppResult<Option<ScoredCandidate>> {
        Ok(self
            .rank(ai_name, ai_calories, portion_grams, candidates)?
            .into_iter()
            .next())
    }
}

fn compare_best_first(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.match_confidence
        .total_cmp(&a.match_confidence)
        .then_with(|| b.calorie_similarity.total_cmp(&a.calorie_similarity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriadapt_core::errors::ErrorCode;

    fn food(id: &str, description: &str, calories_per_100: f64) -> ReferenceFood {
        ReferenceFood {
            id: id.into(),
            description: description.into(),
            calories_per_100,
            protein_per_100: 0.0,
            carbs_per_100: 0.0,
            fat_per_100: 0.0,
            fiber_per_100: 0.0,
        }
    }

    #[test]
    fn test_banana_scores_verified_range() {
        let matcher = ReferenceMatcher::default();
        let scored = matcher.score("banana", 110.0, 100.0, &food("1", "Banana, raw", 105.0));
        assert!((scored.name_similarity - 1.0).abs() < f64::EPSILON);
        assert!((scored.calorie_similarity - 0.848_484_848).abs() < 1e-6);
        assert!((scored.match_confidence - 0.954_545_454).abs() < 1e-6);
    }

    #[test]
    fn test_rank_ignores_external_order() {
        let matcher = ReferenceMatcher::default();
        let candidates = [
            food("1", "Banana chips", 519.0),
            food("2", "Banana, raw", 89.0),
        ];
        let ranked = matcher.rank("banana", 90.0, 100.0, &candidates).unwrap();
        assert_eq!(ranked[0].food.id, "2");
    }

    #[test]
    fn test_tie_prefers_plausible_calories() {
        let matcher = ReferenceMatcher::new(ReconciliationConfig {
            name_weight: 1.0,
            calorie_weight: 0.0,
            ..ReconciliationConfig::default()
        });
        let candidates = [
            food("far", "Oatmeal, cooked", 300.0),
            food("near", "Oatmeal, prepared", 70.0),
        ];
        let best = matcher.best("oatmeal", 71.0, 100.0, &candidates).unwrap().unwrap();
        assert_eq!(best.food.id, "near");
    }

    #[test]
    fn test_portion_scales_reference_calories() {
        let matcher = ReferenceMatcher::default();
        let rice = food("r", "Rice, white, cooked", 130.0);
        let at_100 = matcher.score("white rice", 260.0, 100.0, &rice);
        let at_200 = matcher.score("white rice", 260.0, 200.0, &rice);
        assert!(at_100.calorie_similarity.abs() < f64::EPSILON);
        assert!((at_200.calorie_similarity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_calories_is_data_quality_error() {
        let matcher = ReferenceMatcher::default();
        let err = matcher.rank("water", 0.0, 100.0, &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::DataQuality);
    }

    #[test]
    fn test_negative_or_nan_calories_is_invalid_input() {
        let matcher = ReferenceMatcher::default();
        assert_eq!(
            matcher.rank("x", -5.0, 100.0, &[]).unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            matcher.rank("x", f64::NAN, 100.0, &[]).unwrap_err().code,
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn test_no_candidates_yields_none() {
        let matcher = ReferenceMatcher::default();
        assert!(matcher.best("mystery stew", 400.0, 100.0, &[]).unwrap().is_none());
    }
}
