// ABOUTME: Nutrient reconciliation configuration for reference matching and tier selection
// ABOUTME: Score weights, calorie tolerance, tier thresholds, portion default, and stop-words
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use nutriadapt_core::constants::reconciliation;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration for the reference matcher and nutrient reconciler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Weight of name similarity in the match score
    pub name_weight: f64,
    /// Weight of calorie similarity in the match score
    pub calorie_weight: f64,
    /// Relative calorie error at which calorie similarity reaches zero
    pub calorie_tolerance: f64,
    /// Scores below this keep the AI estimate alone
    pub ai_only_threshold: f64,
    /// Scores above this replace the estimate with the reference
    pub verified_threshold: f64,
    /// Minimum confidence reported for a blended result
    pub blended_confidence_floor: f64,
    /// Portion used when the caller supplies none (grams)
    pub default_portion_grams: f64,
    /// Candidates requested from the reference source
    pub candidate_limit: u32,
    /// Qualifier tokens ignored when comparing names
    pub qualifier_stopwords: Vec<String>,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            name_weight: reconciliation::NAME_WEIGHT,
            calorie_weight: reconciliation::CALORIE_WEIGHT,
            calorie_tolerance: reconciliation::CALORIE_TOLERANCE,
            ai_only_threshold: reconciliation::AI_ONLY_THRESHOLD,
            verified_threshold: reconciliation::VERIFIED_THRESHOLD,
            blended_confidence_floor: reconciliation::BLENDED_CONFIDENCE_FLOOR,
            default_portion_grams: reconciliation::DEFAULT_PORTION_GRAMS,
            candidate_limit: reconciliation::CANDIDATE_LIMIT,
            qualifier_stopwords: reconciliation::QUALIFIER_STOPWORDS
                .iter()
                .map(|word| (*word).to_owned())
                .collect(),
        }
    }
}

impl ReconciliationConfig {
    /// Validate weights and thresholds
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when weights do not sum to 1.0, thresholds leave [0, 1]
    /// or are out of order, or tolerance/portion/limit are not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_weight < 0.0 || self.calorie_weight < 0.0 {
            return Err(ConfigError::InvalidWeights(
                "match score weights must not be negative",
            ));
        }
        if (self.name_weight + self.calorie_weight - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidWeights(
                "name_weight + calorie_weight must equal 1.0",
            ));
        }
        for threshold in [
            self.ai_only_threshold,
            self.verified_threshold,
            self.blended_confidence_floor,
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValueOutOfRange(
                    "confidence thresholds must lie within [0, 1]",
                ));
            }
        }
        if self.ai_only_threshold >= self.verified_threshold {
            return Err(ConfigError::InvalidRange(
                "ai_only_threshold must be < verified_threshold",
            ));
        }
        if !(self.calorie_tolerance.is_finite() && self.calorie_tolerance > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "calorie_tolerance must be positive",
            ));
        }
        if !(self.default_portion_grams.is_finite() && self.default_portion_grams > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "default_portion_grams must be positive",
            ));
        }
        if self.candidate_limit == 0 || self.candidate_limit > reconciliation::MAX_CANDIDATE_LIMIT {
            return Err(ConfigError::ValueOutOfRange(
                "candidate_limit must be between 1 and 200",
            ));
        }
        Ok(())
    }
}
