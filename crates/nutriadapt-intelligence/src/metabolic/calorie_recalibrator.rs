// ABOUTME: Converts a detected adaptation into a new daily calorie target and an event record
// ABOUTME: Rounds half away from zero and applies the absolute calorie floor last
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use chrono::{DateTime, Utc};
use nutriadapt_core::models::{AdaptationEvent, AdaptationType};
use uuid::Uuid;

use super::adaptation_detector::AdaptationSignal;
use crate::config::MetabolicConfig;

/// Calorie target recalibrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalorieRecalibrator {
    calorie_floor: i32,
}

impl CalorieRecalibrator {
    /// Recalibrator with the given absolute floor (kcal/day)
    #[must_use]
    pub const fn new(calorie_floor: i32) -> Self {
        Self { calorie_floor }
    }

    /// Recalibrator configured from metabolic settings
    #[must_use]
    pub const fn from_config(config: &MetabolicConfig) -> Self {
        Self::new(config.calorie_floor)
    }

    /// New daily target for `current` given an adaptation of `magnitude`
    ///
    /// A deficit stall lowers the target, a surplus slowdown raises it, and a
    /// stable classification keeps it. The floor applies to every outcome.
    #[must_use]
    pub fn recalibrate(
        &self,
        current: i32,
        adaptation_type: AdaptationType,
        magnitude: f64,
    ) -> i32 {
        let adjustment = (f64::from(current) * magnitude).round() as i32;
        let target = match adaptation_type {
            AdaptationType::DeficitStall => current.saturating_sub(adjustment),
            AdaptationType::SurplusSlow => current.saturating_add(adjustment),
            AdaptationType::Stable => current,
        };
        target.max(self.calorie_floor)
    }

    /// Build the append-only event for a detected signal
    ///
    /// The event is not applied to any profile here; that is a separate,
    /// idempotent step keyed by the returned event id.
    #[must_use]
    pub fn build_event(
        &self,
        user_id: Uuid,
        current: i32,
        signal: &AdaptationSignal,
        detected_at: DateTime<Utc>,
    ) -> AdaptationEvent {
        AdaptationEvent {
            id: Uuid::new_v4(),
            user_id,
            detected_at,
            week_start_date: signal.recent.start_date,
            adaptation_type: signal.adaptation_type,
            magnitude: signal.magnitude,
            old_calories: current,
            new_calories: self.recalibrate(current, signal.adaptation_type, signal.magnitude),
            old_expenditure_estimate: signal.early.expenditure.unwrap_or_default(),
            new_expenditure_estimate: signal.recent.expenditure.unwrap_or_default(),
        }
    }
}

impl Default for CalorieRecalibrator {
    fn default() -> Self {
        Self::from_config(&MetabolicConfig::default())
    }
}
