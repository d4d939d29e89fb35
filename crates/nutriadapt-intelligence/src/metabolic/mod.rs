// ABOUTME: Metabolic adaptation engine: daily alignment, EMA trend, energy balance, detection
// ABOUTME: Re-exports the pipeline and each stage for direct use and testing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Metabolic Adaptation Engine
//!
//! Infers when a user's energy expenditure has shifted enough to warrant a new
//! calorie target:
//!
//! 1. [`DailySeries`] aligns sparse samples onto calendar days
//! 2. [`TrendSmoother`] turns noisy weigh-ins into an EMA trend weight
//! 3. [`EnergyBalanceEstimator`] infers expenditure from trend slope and intake
//! 4. [`AdaptationDetector`] compares an early and a recent window
//! 5. [`CalorieRecalibrator`] proposes the new target as an `AdaptationEvent`
//!
//! All stages are pure; [`MetabolicPipeline`] chains them for one or many users.

/// Two-window adaptation state machine
pub mod adaptation_detector;
/// Target recalibration and event construction
pub mod calorie_recalibrator;
/// Per-day alignment of raw samples
pub mod daily_series;
/// Energy-balance identity over a window
pub mod energy_balance;
/// End-to-end assessment
pub mod pipeline;
/// EMA trend weight
pub mod trend_smoother;

pub use adaptation_detector::{
    AdaptationDetector, AdaptationSignal, DetectionOutcome, InconclusiveReason,
};
pub use calorie_recalibrator::CalorieRecalibrator;
pub use daily_series::DailySeries;
pub use energy_balance::{EnergyBalanceEstimator, MetabolicDay, WindowSummary};
pub use pipeline::{MetabolicAssessment, MetabolicPipeline, UserHistory};
pub use trend_smoother::TrendSmoother;
