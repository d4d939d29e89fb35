// ABOUTME: Metabolic tracking models for body weight, energy intake, and adaptation events
// ABOUTME: WeightSample, IntakeSample, TrendPoint, AdaptationType, and AdaptationEvent definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One optional body-weight reading for a calendar day (lbs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    /// Calendar day of the reading
    pub date: NaiveDate,
    /// Weight in pounds, `None` when the user did not weigh in
    pub weight: Option<f64>,
}

impl WeightSample {
    /// Create a sample with a recorded weight
    #[must_use]
    pub const fn new(date: NaiveDate, weight: f64) -> Self {
        Self {
            date,
            weight: Some(weight),
        }
    }

    /// Create a placeholder for a day without a weigh-in
    #[must_use]
    pub const fn missing(date: NaiveDate) -> Self {
        Self { date, weight: None }
    }
}

/// Total logged energy intake for a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeSample {
    /// Calendar day the food was logged for
    pub date: NaiveDate,
    /// Sum of logged calories (kcal)
    pub calories_in: f64,
}

impl IntakeSample {
    /// Create an intake sample
    #[must_use]
    pub const fn new(date: NaiveDate, calories_in: f64) -> Self {
        Self { date, calories_in }
    }
}

/// Smoothed trend weight for one day, regenerated on demand from raw samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// EMA-smoothed weight (lbs)
    pub trend_weight: f64,
}

/// Classification of a metabolic adaptation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationType {
    /// Weight loss slowed while intake held steady in a deficit
    DeficitStall,
    /// Weight gain slowed while intake held steady in a surplus
    SurplusSlow,
    /// No material change (explicit reporting mode only)
    Stable,
}

impl AdaptationType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeficitStall => "deficit_stall",
            Self::SurplusSlow => "surplus_slow",
            Self::Stable => "stable",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "deficit_stall" => Some(Self::DeficitStall),
            "surplus_slow" => Some(Self::SurplusSlow),
            "stable" => Some(Self::Stable),
            _ => None,
        }
    }
}

/// Append-only record of one detected adaptation and the recalibrated target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationEvent {
    /// Idempotency key for the apply step
    pub id: Uuid,
    /// User the event belongs to
    pub user_id: Uuid,
    /// When detection ran
    pub detected_at: DateTime<Utc>,
    /// First day of the recent comparison window
    pub week_start_date: NaiveDate,
    /// Kind of adaptation detected
    pub adaptation_type: AdaptationType,
    /// Clamped adaptation magnitude (fraction of the calorie target)
    pub magnitude: f64,
    /// Calorie target before recalibration (kcal/day)
    pub old_calories: i32,
    /// Calorie target after recalibration (kcal/day), never below the floor
    pub new_calories: i32,
    /// Expenditure inferred from the early window (kcal/day)
    pub old_expenditure_estimate: f64,
    /// Expenditure inferred from the recent window (kcal/day)
    pub new_expenditure_estimate: f64,
}

impl AdaptationEvent {
    /// Signed change the event applies to the calorie target
    #[must_use]
    pub const fn calorie_delta(&self) -> i32 {
        self.new_calories - self.old_calories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptation_type_db_round_trip() {
        for kind in [
            AdaptationType::DeficitStall,
            AdaptationType::SurplusSlow,
            AdaptationType::Stable,
        ] {
            assert_eq!(AdaptationType::from_db_str(kind.as_str()), Some(kind));
        }
        assert_eq!(AdaptationType::from_db_str("plateau"), None);
    }

    #[test]
    fn test_adaptation_type_serializes_snake_case() {
        let json = serde_json::to_string(&AdaptationType::DeficitStall).unwrap();
        assert_eq!(json, "\"deficit_stall\"");
    }
}
