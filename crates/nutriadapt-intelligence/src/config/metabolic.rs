// ABOUTME: Metabolic engine configuration for trend smoothing and adaptation detection
// ABOUTME: Window geometry, stability band, rate floors, magnitude clamp, and calorie floor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! Metabolic Configuration
//!
//! Defaults mirror `nutriadapt_core::constants::metabolic`. Window start days are
//! 1-based positions inside the most recent `min_days_for_update` days of history.

use nutriadapt_core::constants::metabolic;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration for the trend smoother, energy balance estimator, and detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetabolicConfig {
    /// EMA half-life (days)
    pub trend_half_life_days: f64,
    /// Energy per pound of body mass (kcal)
    pub kcal_per_lb: f64,
    /// Length of each comparison window (days)
    pub window_days: usize,
    /// History required before detection runs (days)
    pub min_days_for_update: usize,
    /// 1-based start day of the early window
    pub early_window_start_day: usize,
    /// 1-based start day of the recent window
    pub recent_window_start_day: usize,
    /// Exclusive bound on the intake change between windows (kcal/day)
    pub intake_stability_band_kcal: f64,
    /// Early-window rate magnitude that counts as meaningful loss or gain (lb/day)
    pub rate_floor_lb_per_day: f64,
    /// Rate change between windows that counts as a slowdown (lb/day)
    pub rate_change_floor_lb_per_day: f64,
    /// Lower clamp on adaptation magnitude
    pub adapt_floor: f64,
    /// Upper clamp on adaptation magnitude
    pub adapt_ceiling: f64,
    /// Absolute minimum calorie target (kcal/day)
    pub calorie_floor: i32,
}

impl Default for MetabolicConfig {
    fn default() -> Self {
        Self {
            trend_half_life_days: metabolic::TREND_HALF_LIFE_DAYS,
            kcal_per_lb: metabolic::KCAL_PER_LB,
            window_days: metabolic::WINDOW_DAYS,
            min_days_for_update: metabolic::MIN_DAYS_FOR_UPDATE,
            early_window_start_day: metabolic::EARLY_WINDOW_START_DAY,
            recent_window_start_day: metabolic::RECENT_WINDOW_START_DAY,
            intake_stability_band_kcal: metabolic::INTAKE_STABILITY_BAND_KCAL,
            rate_floor_lb_per_day: metabolic::RATE_FLOOR_LB_PER_DAY,
            rate_change_floor_lb_per_day: metabolic::RATE_CHANGE_FLOOR_LB_PER_DAY,
            adapt_floor: metabolic::ADAPT_FLOOR,
            adapt_ceiling: metabolic::ADAPT_CEILING,
            calorie_floor: metabolic::CALORIE_FLOOR,
        }
    }
}

impl MetabolicConfig {
    /// 0-based index of the early window's first day inside the detection tail
    #[must_use]
    pub const fn early_window_start_index(&self) -> usize {
        self.early_window_start_day.saturating_sub(1)
    }

    /// 0-based index of the recent window's first day inside the detection tail
    #[must_use]
    pub const fn recent_window_start_index(&self) -> usize {
        self.recent_window_start_day.saturating_sub(1)
    }

    /// Validate window geometry and thresholds
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a value is non-positive, out of order, or the
    /// windows do not fit inside `min_days_for_update`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.trend_half_life_days.is_finite() && self.trend_half_life_days > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "trend_half_life_days must be positive",
            ));
        }
        if !(self.kcal_per_lb.is_finite() && self.kcal_per_lb > 0.0) {
            return Err(ConfigError::ValueOutOfRange("kcal_per_lb must be positive"));
        }
        if self.window_days == 0 {
            return Err(ConfigError::ValueOutOfRange("window_days must be at least 1"));
        }
        if self.early_window_start_day == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "early_window_start_day is 1-based and must be at least 1",
            ));
        }
        if self.early_window_start_day + self.window_days > self.recent_window_start_day {
            return Err(ConfigError::InvalidRange(
                "early window must end on or before the recent window starts",
            ));
        }
        if self.recent_window_start_day + self.window_days > self.min_days_for_update {
            return Err(ConfigError::InvalidRange(
                "recent window must end within min_days_for_update",
            ));
        }
        if self.intake_stability_band_kcal <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "intake_stability_band_kcal must be positive",
            ));
        }
        if self.rate_floor_lb_per_day < 0.0 || self.rate_change_floor_lb_per_day < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "rate floors must not be negative",
            ));
        }
        if self.adapt_floor < 0.0 || self.adapt_ceiling >= 1.0 {
            return Err(ConfigError::ValueOutOfRange(
                "adaptation clamp must lie within [0, 1)",
            ));
        }
        if self.adapt_floor > self.adapt_ceiling {
            return Err(ConfigError::InvalidRange(
                "adapt_floor must be <= adapt_ceiling",
            ));
        }
        if self.calorie_floor <= 0 {
            return Err(ConfigError::ValueOutOfRange("calorie_floor must be positive"));
        }
        Ok(())
    }
}
