// ABOUTME: Nutrient reconciliation engine merging AI estimates with verified reference data
// ABOUTME: Similarity measures, candidate ranking, and three-tier reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

/// Candidate reconciliation into a final nutrient vector
pub mod nutrient_reconciler;
/// Candidate scoring and ranking
pub mod reference_matcher;
/// Name and calorie similarity
pub mod similarity;

pub use nutrient_reconciler::NutrientReconciler;
pub use reference_matcher::{validate_ai_calories, ReferenceMatcher, ScoredCandidate};
pub use similarity::{calorie_similarity, jaccard, name_similarity, tokenize};
