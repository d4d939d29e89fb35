// ABOUTME: Fuses an AI nutrient estimate with the best reference match into a final result
// ABOUTME: Three explicit tiers (ai_only, blended, verified) selected by match confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Nutrient Reconciler
//!
//! | match confidence | source | values |
//! |---|---|---|
//! | none or `< 0.6` | `ai_only` | AI estimate unchanged |
//! | `0.6 ..= 0.8` | `blended` | `ai * (1 - m) + ref * m` |
//! | `> 0.8` | `verified` | reference scaled to the portion |
//!
//! Reconciliation is a pure function of its inputs; calling it twice with the same
//! estimate and candidate yields identical results.

use nutriadapt_core::errors::{AppError, AppResult};
use nutriadapt_core::models::{
    NutrientEstimate, NutrientProfile, NutrientSource, ReconciledNutrientResult, ReferenceFood,
};
use tracing::debug;

use super::reference_matcher::{validate_ai_calories, ReferenceMatcher, ScoredCandidate};
use crate::config::ReconciliationConfig;

/// Nutrient reconciliation engine
#[derive(Debug, Clone, Default)]
pub struct NutrientReconciler {
    matcher: ReferenceMatcher,
}

impl NutrientReconciler {
    /// Reconciler using validated reconciliation settings
    #[must_use]
    pub const fn new(config: ReconciliationConfig) -> Self {
        Self {
            matcher: ReferenceMatcher::new(config),
        }
    }

    /// Settings in use
    #[must_use]
    pub const fn config(&self) -> &ReconciliationConfig {
        self.matcher.config()
    }

    /// Matcher used to score candidates
    #[must_use]
    pub const fn matcher(&self) -> &ReferenceMatcher {
        &self.matcher
    }

    /// Portion to use, falling back to the configured default
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a non-finite or non-positive portion
    pub fn resolve_portion(&self, portion_grams: Option<f64>) -> AppResult<f64> {
        let portion = portion_grams.unwrap_or(self.config().default_portion_grams);
        if !portion.is_finite() || portion <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "portion must be a positive number of grams, got {portion}"
            )));
        }
        Ok(portion)
    }

    /// Check the caller-supplied estimate
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a blank name or unusable calories, and a
    /// data-quality error for a zero-calorie estimate
    pub fn validate_estimate(estimate: &NutrientEstimate) -> AppResult<()> {
        if estimate.name.trim().is_empty() {
            return Err(AppError::invalid_input("nutrient estimate name must not be empty"));
        }
        validate_ai_calories(estimate.calories)
            .map_err(|e| e.with_resource_id(estimate.name.clone()))
    }

    /// Score the candidates and reconcile against the best one
    ///
    /// # Errors
    ///
    /// Returns the errors of [`NutrientReconciler::validate_estimate`] and
    /// [`NutrientReconciler::resolve_portion`]; an empty candidate list is not an error
    pub fn reconcile_candidates(
        &self,
        estimate: &NutrientEstimate,
        candidates: &[ReferenceFood],
        portion_grams: Option<f64>,
    ) -> AppResult<ReconciledNutrientResult> {
        Self::validate_estimate(estimate)?;
        let portion = self.resolve_portion(portion_grams)?;
        let best = self
            .matcher
            .best(&estimate.name, estimate.calories, portion, candidates)?;
        self.reconcile(estimate, best.as_ref(), Some(portion))
    }

    /// Reconcile an estimate with its best candidate (or none)
    ///
    /// # Errors
    ///
    /// Returns the errors of [`NutrientReconciler::validate_estimate`] and
    /// [`NutrientReconciler::resolve_portion`]
    pub fn reconcile(
        &self,
        estimate: &NutrientEstimate,
        best: Option<&ScoredCandidate>,
        portion_grams: Option<f64>,
    ) -> AppResult<ReconciledNutrientResult> {
        Self::validate_estimate(estimate)?;
        let portion = self.resolve_portion(portion_grams)?;
        let config = self.config();
        let ai = estimate.nutrients().sanitized();
        let ai_confidence = sanitize_confidence(estimate.confidence);

        let result = match best {
            Some(candidate) if candidate.match_confidence > config.verified_threshold => {
                let reference = candidate.food.for_portion(portion);
                build(
                    estimate,
                    reference,
                    ai_confidence.max(candidate.match_confidence),
                    NutrientSource::Verified,
                    Some(candidate),
                    None,
                )
            }
            Some(candidate) if candidate.match_confidence >= config.ai_only_threshold => {
                let m = candidate.match_confidence;
                let reference = candidate.food.for_portion(portion);
                build(
                    estimate,
                    ai.blend(&reference, m),
                    ai_confidence.max(config.blended_confidence_floor),
                    NutrientSource::Blended,
                    Some(candidate),
                    Some(m),
                )
            }
            weak => build(
                estimate,
                ai,
                ai_confidence,
                NutrientSource::AiOnly,
                weak,
                None,
            ),
        };

        debug!(
            food = %estimate.name,
            source = result.source.as_str(),
            match_confidence = result.match_confidence,
            "Nutrient reconciliation tier selected"
        );
        Ok(result)
    }
}

fn sanitize_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn build(
    estimate: &NutrientEstimate,
    nutrients: NutrientProfile,
    confidence: f64,
    source: NutrientSource,
    candidate: Option<&ScoredCandidate>,
    blend_ratio: Option<f64>,
) -> ReconciledNutrientResult {
    let nutrients = nutrients.sanitized();
    ReconciledNutrientResult {
        name: estimate.name.clone(),
        calories: nutrients.calories,
        protein_g: nutrients.protein_g,
        carbs_g: nutrients.carbs_g,
        fat_g: nutrients.fat_g,
        fiber_g: nutrients.fiber_g,
        confidence,
        source,
        matched_reference_id: candidate.map(|c| c.food.id.clone()),
        match_confidence: candidate.map(|c| c.match_confidence),
        blend_ratio,
    }
}
