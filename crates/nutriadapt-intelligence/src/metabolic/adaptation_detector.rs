// ABOUTME: Two-window state machine detecting metabolic adaptation from trend weight and intake
// ABOUTME: Classifies deficit stalls and surplus slowdowns with a clamped magnitude
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Adaptation Detector
//!
//! Compares an early window (days 7-14) with a recent window (days 21-28) of the
//! most recent 28 days. Adaptation is only inferred when intake held steady
//! between the windows while the rate of weight change slowed materially.
//!
//! The default contract ([`AdaptationDetector::detect`]) emits nothing when nothing
//! changed materially; [`AdaptationDetector::evaluate`] additionally reports
//! `Stable` and the reason for inconclusive runs.

use nutriadapt_core::models::AdaptationType;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::energy_balance::{EnergyBalanceEstimator, MetabolicDay, WindowSummary};
use crate::config::MetabolicConfig;

/// A detected adaptation ready for recalibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptationSignal {
    /// Deficit stall or surplus slowdown
    pub adaptation_type: AdaptationType,
    /// Magnitude after clamping to the configured band
    pub magnitude: f64,
    /// `|rate_B - rate_A| / |rate_A|` before clamping
    pub raw_ratio: f64,
    /// Early window measurements
    pub early: WindowSummary,
    /// Recent window measurements
    pub recent: WindowSummary,
}

/// Why a run could not reach a classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InconclusiveReason {
    /// Fewer aligned days than `min_days_for_update`
    InsufficientHistory {
        /// Days available
        available: usize,
        /// Days required
        required: usize,
    },
    /// A window had no logged intake at all
    MissingIntake,
    /// Intake changed by at least the stability band between windows
    IntakeSwing {
        /// `intake_B - intake_A` (kcal/day)
        delta_kcal: f64,
    },
}

/// Full result of one detector run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DetectionOutcome {
    /// Material adaptation detected
    Adapted(AdaptationSignal),
    /// Windows compared with no material change
    Stable {
        /// Early window measurements
        early: WindowSummary,
        /// Recent window measurements
        recent: WindowSummary,
    },
    /// Not enough signal to compare
    Inconclusive(InconclusiveReason),
}

impl DetectionOutcome {
    /// The signal when adaptation was detected
    #[must_use]
    pub const fn signal(&self) -> Option<&AdaptationSignal> {
        match self {
            Self::Adapted(signal) => Some(signal),
            Self::Stable { .. } | Self::Inconclusive(_) => None,
        }
    }

    /// Classification for explicit reporting mode
    #[must_use]
    pub const fn adaptation_type(&self) -> Option<AdaptationType> {
        match self {
            Self::Adapted(signal) => Some(signal.adaptation_type),
            Self::Stable { .. } => Some(AdaptationType::Stable),
            Self::Inconclusive(_) => None,
        }
    }
}

/// Metabolic adaptation detector
#[derive(Debug, Clone)]
pub struct AdaptationDetector {
    config: MetabolicConfig,
    estimator: EnergyBalanceEstimator,
}

impl AdaptationDetector {
    /// Detector using validated metabolic settings
    #[must_use]
    pub fn new(config: MetabolicConfig) -> Self {
        let estimator = EnergyBalanceEstimator::from_config(&config);
        Self { config, estimator }
    }

    /// Settings this detector runs with
    #[must_use]
    pub const fn config(&self) -> &MetabolicConfig {
        &self.config
    }

    /// Default contract: a signal only when adaptation is material
    #[must_use]
    pub fn detect(&self, days: &[MetabolicDay]) -> Option<AdaptationSignal> {
        self.evaluate(days).signal().copied()
    }

    /// Run the two-window comparison over the most recent `min_days_for_update` days
    #[must_use]
    pub fn evaluate(&self, days: &[MetabolicDay]) -> DetectionOutcome {
        let required = self.config.min_days_for_update;
        if days.len() < required {
            debug!(available = days.len(), required, "Not enough history for adaptation check");
            return DetectionOutcome::Inconclusive(InconclusiveReason::InsufficientHistory {
                available: days.len(),
                required,
            });
        }
        let tail = &days[days.len() - required..];

        let (Some(early), Some(recent)) = (
            self.estimator
                .summarize(tail, self.config.early_window_start_index()),
            self.estimator
                .summarize(tail, self.config.recent_window_start_index()),
        ) else {
            return DetectionOutcome::Inconclusive(InconclusiveReason::InsufficientHistory {
                available: days.len(),
                required,
            });
        };

        let (Some(intake_a), Some(intake_b)) = (early.mean_intake, recent.mean_intake) else {
            info!(
                early_logged_days = early.logged_days,
                recent_logged_days = recent.logged_days,
                "Adaptation check inconclusive: a window has no logged intake"
            );
            return DetectionOutcome::Inconclusive(InconclusiveReason::MissingIntake);
        };

        let delta_kcal = intake_b - intake_a;
        if delta_kcal.abs() >= self.config.intake_stability_band_kcal {
            info!(
                delta_kcal,
                band_kcal = self.config.intake_stability_band_kcal,
                "Adaptation check inconclusive: intake swing between windows"
            );
            return DetectionOutcome::Inconclusive(InconclusiveReason::IntakeSwing { delta_kcal });
        }

        let rate_a = early.rate_lb_per_day;
        let rate_b = recent.rate_lb_per_day;
        let rate_change = rate_b - rate_a;

        let adaptation_type = if rate_a < -self.config.rate_floor_lb_per_day
            && rate_change > self.config.rate_change_floor_lb_per_day
        {
            AdaptationType::DeficitStall
        } else if rate_a > self.config.rate_floor_lb_per_day
            && rate_change < -self.config.rate_change_floor_lb_per_day
        {
            AdaptationType::SurplusSlow
        } else {
            debug!(rate_a, rate_b, "No material change in rate of weight change");
            return DetectionOutcome::Stable { early, recent };
        };

        let raw_ratio = rate_change.abs() / rate_a.abs();
        let magnitude = raw_ratio
            .max(self.config.adapt_floor)
            .min(self.config.adapt_ceiling);
        debug!(
            adaptation_type = adaptation_type.as_str(),
            rate_a, rate_b, raw_ratio, magnitude, "Metabolic adaptation detected"
        );

        DetectionOutcome::Adapted(AdaptationSignal {
            adaptation_type,
            magnitude,
            raw_ratio,
            early,
            recent,
        })
    }
}

impl Default for AdaptationDetector {
    fn default() -> Self {
        Self::new(MetabolicConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn build(trend: impl Fn(usize) -> f64, intake: impl Fn(usize) -> Option<f64>, len: usize) -> Vec<MetabolicDay> {
        let d0 = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        (0..len)
            .map(|i| MetabolicDay {
                date: d0 + Days::new(i as u64),
                trend_weight: trend(i),
                calories_in: intake(i),
            })
            .collect()
    }

    /// Loses ~0.108 lb/day through day 14, then ~0.05 lb/day from day 21
    fn stall_trend(i: usize) -> f64 {
        let i = i as f64;
        if i <= 13.0 {
            180.0 - 1.4 * i / 13.0
        } else if i < 20.0 {
            178.6 + (175.0 - 178.6) * (i - 13.0) / 7.0
        } else {
            175.0 - 0.05 * (i - 20.0)
        }
    }

    #[test]
    fn test_short_history_is_inconclusive() {
        let detector = AdaptationDetector::default();
        let days = build(|_| 180.0, |_| Some(1800.0), 27);
        assert_eq!(detector.detect(&days), None);
        assert!(matches!(
            detector.evaluate(&days),
            DetectionOutcome::Inconclusive(InconclusiveReason::InsufficientHistory {
                available: 27,
                required: 28
            })
        ));
    }

    #[test]
    fn test_flat_weight_is_stable() {
        let detector = AdaptationDetector::default();
        let days = build(|_| 180.0, |_| Some(1800.0), 28);
        assert_eq!(detector.detect(&days), None);
        let outcome = detector.evaluate(&days);
        assert_eq!(outcome.adaptation_type(), Some(AdaptationType::Stable));
        if let DetectionOutcome::Stable { early, recent } = outcome {
            assert!((early.expenditure.unwrap() - 1800.0).abs() < 1e-9);
            assert!((recent.expenditure.unwrap() - 1800.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deficit_stall_detected_and_clamped() {
        let detector = AdaptationDetector::default();
        let days = build(stall_trend, |_| Some(1800.0), 28);
        let signal = detector.detect(&days).unwrap();
        assert_eq!(signal.adaptation_type, AdaptationType::DeficitStall);
        assert!(signal.raw_ratio > 0.25);
        assert!((signal.magnitude - 0.25).abs() < 1e-12);
        assert!(signal.early.rate_lb_per_day < -0.1);
        assert!((signal.recent.rate_lb_per_day + 0.05).abs() < 1e-9);
        assert_eq!(signal.recent.start_date, days[20].date);
    }

    #[test]
    fn test_surplus_slow_detected() {
        let detector = AdaptationDetector::default();
        let days = build(
            |i| if i <= 13 { 150.0 + 0.4 * i as f64 } else { 155.2 + 0.34 * (i as f64 - 13.0) },
            |_| Some(2800.0),
            28,
        );
        let signal = detector.detect(&days).unwrap();
        assert_eq!(signal.adaptation_type, AdaptationType::SurplusSlow);
        assert!((signal.magnitude - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_small_ratio_clamped_up_to_floor() {
        let detector = AdaptationDetector::default();
        // rate_A = -0.6, rate_B = -0.54: ratio 0.1 sits at the floor, 0.06 change clears 0.05.
        let days = build(
            |i| if i <= 13 { 200.0 - 0.6 * i as f64 } else { 192.2 - 0.54 * (i as f64 - 13.0) },
            |_| Some(1500.0),
            28,
        );
        let signal = detector.detect(&days).unwrap();
        assert!(signal.magnitude >= 0.10 && signal.magnitude <= 0.25);
    }

    #[test]
    fn test_intake_swing_at_band_is_inconclusive() {
        let detector = AdaptationDetector::default();
        let days = build(stall_trend, |i| Some(if i < 14 { 1800.0 } else { 2000.0 }), 28);
        assert_eq!(detector.detect(&days), None);
        assert!(matches!(
            detector.evaluate(&days),
            DetectionOutcome::Inconclusive(InconclusiveReason::IntakeSwing { .. })
        ));
    }

    #[test]
    fn test_intake_swing_just_inside_band_still_detects() {
        let detector = AdaptationDetector::default();
        let days = build(stall_trend, |i| Some(if i < 14 { 1800.0 } else { 1999.0 }), 28);
        assert!(detector.detect(&days).is_some());
    }

    #[test]
    fn test_unlogged_window_is_inconclusive() {
        let detector = AdaptationDetector::default();
        let days = build(stall_trend, |i| if (20..27).contains(&i) { None } else { Some(1800.0) }, 28);
        assert!(matches!(
            detector.evaluate(&days),
            DetectionOutcome::Inconclusive(InconclusiveReason::MissingIntake)
        ));
    }

    #[test]
    fn test_only_last_28_days_considered() {
        let detector = AdaptationDetector::default();
        let mut days = build(|_| 250.0, |_| Some(5000.0), 10);
        let tail = build(stall_trend, |_| Some(1800.0), 28);
        days.extend(tail);
        assert!(detector.detect(&days).is_some());
    }

    #[test]
    fn test_loss_below_rate_floor_is_stable() {
        let detector = AdaptationDetector::default();
        let days = build(|i| 180.0 - 0.05 * i as f64, |_| Some(1800.0), 28);
        assert!(matches!(detector.evaluate(&days), DetectionOutcome::Stable { .. }));
    }
}
