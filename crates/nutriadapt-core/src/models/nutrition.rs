// ABOUTME: Nutrient models shared by the reference lookup and reconciliation engine
// ABOUTME: NutrientEstimate, ReferenceFood, NutrientProfile vector, and ReconciledNutrientResult
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use serde::{Deserialize, Serialize};

use crate::constants::reconciliation::REFERENCE_BASIS_GRAMS;

/// The five nutrient fields every estimate, reference, and result carries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientProfile {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Dietary fiber (g)
    pub fiber_g: f64,
}

impl NutrientProfile {
    /// Multiply every field by `factor`
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|value| value * factor)
    }

    /// Weighted blend toward `other`: `self * (1 - weight) + other * weight`
    #[must_use]
    pub fn blend(&self, other: &Self, weight: f64) -> Self {
        Self {
            calories: other.calories.mul_add(weight, self.calories * (1.0 - weight)),
            protein_g: other.protein_g.mul_add(weight, self.protein_g * (1.0 - weight)),
            carbs_g: other.carbs_g.mul_add(weight, self.carbs_g * (1.0 - weight)),
            fat_g: other.fat_g.mul_add(weight, self.fat_g * (1.0 - weight)),
            fiber_g: other.fiber_g.mul_add(weight, self.fiber_g * (1.0 - weight)),
        }
    }

    /// Replace negative and non-finite fields with zero
    #[must_use]
    pub fn sanitized(&self) -> Self {
        self.map(|value| if value.is_finite() { value.max(0.0) } else { 0.0 })
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein_g: f(self.protein_g),
            carbs_g: f(self.carbs_g),
            fat_g: f(self.fat_g),
            fiber_g: f(self.fiber_g),
        }
    }
}

/// Uncertain nutrition estimate for one food item, produced upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientEstimate {
    /// Food name as recognized upstream
    pub name: String,
    /// Estimated energy for the serving (kcal)
    pub calories: f64,
    /// Estimated protein (g)
    #[serde(default)]
    pub protein_g: f64,
    /// Estimated carbohydrates (g)
    #[serde(default)]
    pub carbs_g: f64,
    /// Estimated fat (g)
    #[serde(default)]
    pub fat_g: f64,
    /// Estimated fiber (g)
    #[serde(default)]
    pub fiber_g: f64,
    /// Upstream confidence in [0, 1]
    pub confidence: f64,
}

impl NutrientEstimate {
    /// Nutrient fields as a vector
    #[must_use]
    pub const fn nutrients(&self) -> NutrientProfile {
        NutrientProfile {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
        }
    }
}

/// Verified reference food with nutrients per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFood {
    /// Identifier in the reference database (e.g. FDC id)
    pub id: String,
    /// Reference description, e.g. "Banana, raw"
    pub description: String,
    /// kcal per 100 g
    pub calories_per_100: f64,
    /// Protein g per 100 g
    #[serde(default)]
    pub protein_per_100: f64,
    /// Carbohydrate g per 100 g
    #[serde(default)]
    pub carbs_per_100: f64,
    /// Fat g per 100 g
    #[serde(default)]
    pub fat_per_100: f64,
    /// Fiber g per 100 g
    #[serde(default)]
    pub fiber_per_100: f64,
}

impl ReferenceFood {
    /// Nutrient vector scaled from the 100 g basis to `portion_grams`
    #[must_use]
    pub fn for_portion(&self, portion_grams: f64) -> NutrientProfile {
        NutrientProfile {
            calories: self.calories_per_100,
            protein_g: self.protein_per_100,
            carbs_g: self.carbs_per_100,
            fat_g: self.fat_per_100,
            fiber_g: self.fiber_per_100,
        }
        .scaled(portion_grams / REFERENCE_BASIS_GRAMS)
    }
}

/// Which signal produced a reconciled result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientSource {
    /// AI estimate passed through unchanged
    AiOnly,
    /// Reference values replaced the estimate
    Verified,
    /// Confidence-weighted blend of both
    Blended,
}

impl NutrientSource {
    /// Stable string name used in logs and storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AiOnly => "ai_only",
            Self::Verified => "verified",
            Self::Blended => "blended",
        }
    }
}

/// Final nutrient vector handed to the food-logging flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledNutrientResult {
    /// Food name (from the estimate)
    pub name: String,
    /// Energy (kcal), never negative
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Fiber (g)
    pub fiber_g: f64,
    /// Confidence in the reconciled values
    pub confidence: f64,
    /// Which tier produced the values
    pub source: NutrientSource,
    /// Reference candidate considered, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_reference_id: Option<String>,
    /// Score of that candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_confidence: Option<f64>,
    /// Weight given to the reference in a blend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_ratio: Option<f64>,
}

impl ReconciledNutrientResult {
    /// Nutrient fields as a vector
    #[must_use]
    pub const fn nutrients(&self) -> NutrientProfile {
        NutrientProfile {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_portion_scaling_is_uniform() {
        let banana = ReferenceFood {
            id: "173944".into(),
            description: "Banana, raw".into(),
            calories_per_100: 89.0,
            protein_per_100: 1.1,
            carbs_per_100: 22.8,
            fat_per_100: 0.3,
            fiber_per_100: 2.6,
        };
        let portion = banana.for_portion(118.0);
        assert!((portion.calories - 105.02).abs() < 1e-9);
        assert!((portion.fiber_g - 3.068).abs() < 1e-9);
        assert_eq!(banana.for_portion(100.0).calories, 89.0);
    }

    #[test]
    fn test_blend_endpoints() {
        let ai = NutrientProfile {
            calories: 200.0,
            protein_g: 10.0,
            ..NutrientProfile::default()
        };
        let reference = NutrientProfile {
            calories: 100.0,
            protein_g: 20.0,
            ..NutrientProfile::default()
        };
        assert_eq!(ai.blend(&reference, 0.0), ai);
        assert_eq!(ai.blend(&reference, 1.0), reference);
        let half = ai.blend(&reference, 0.5);
        assert!((half.calories - 150.0).abs() < 1e-9);
        assert!((half.protein_g - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_sanitized_clamps_negative_and_nan() {
        let raw = NutrientProfile {
            calories: 120.0,
            protein_g: -3.0,
            carbs_g: f64::NAN,
            fat_g: f64::INFINITY,
            fiber_g: 1.5,
        };
        let clean = raw.sanitized();
        assert_eq!(clean.protein_g, 0.0);
        assert_eq!(clean.carbs_g, 0.0);
        assert_eq!(clean.fat_g, 0.0);
        assert_eq!(clean.fiber_g, 1.5);
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&NutrientSource::AiOnly).unwrap();
        assert_eq!(json, "\"ai_only\"");
    }
}
