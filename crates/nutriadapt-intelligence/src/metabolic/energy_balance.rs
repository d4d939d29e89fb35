// ABOUTME: Energy-balance identity turning a trend-weight slope and mean intake into expenditure
// ABOUTME: Summarizes one comparison window: rate, mean logged intake, and estimated TDEE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Energy Balance Estimator
//!
//! Net weight change over a window encodes the gap between intake and
//! expenditure: `expenditure = mean_intake - rate * kcal_per_lb`, with
//! `rate = (trend_end - trend_start) / window_days`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::MetabolicConfig;

/// One aligned day of smoothed weight and logged intake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetabolicDay {
    /// Calendar day
    pub date: NaiveDate,
    /// EMA-smoothed weight (lbs)
    pub trend_weight: f64,
    /// Logged intake, `None` when nothing was logged
    pub calories_in: Option<f64>,
}

/// Measurements for one comparison window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// First day of the window
    pub start_date: NaiveDate,
    /// Last day of the window
    pub end_date: NaiveDate,
    /// Trend weight at the start (lbs)
    pub trend_start: f64,
    /// Trend weight at the end (lbs)
    pub trend_end: f64,
    /// Trend slope (lb/day)
    pub rate_lb_per_day: f64,
    /// Mean of logged intake, `None` when no day was logged
    pub mean_intake: Option<f64>,
    /// Days with logged intake
    pub logged_days: usize,
    /// Estimated daily expenditure, `None` without intake
    pub expenditure: Option<f64>,
}

/// Applies the energy-balance identity over fixed-length windows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalanceEstimator {
    window_days: usize,
    kcal_per_lb: f64,
}

impl EnergyBalanceEstimator {
    /// Estimator for the given window length and energy density
    #[must_use]
    pub const fn new(window_days: usize, kcal_per_lb: f64) -> Self {
        Self {
            window_days,
            kcal_per_lb,
        }
    }

    /// Estimator configured from metabolic settings
    #[must_use]
    pub const fn from_config(config: &MetabolicConfig) -> Self {
        Self::new(config.window_days, config.kcal_per_lb)
    }

    /// Window length (days)
    #[must_use]
    pub const fn window_days(&self) -> usize {
        self.window_days
    }

    /// Trend slope across one window (lb/day)
    #[must_use]
    pub fn rate(&self, trend_start: f64, trend_end: f64) -> f64 {
        (trend_end - trend_start) / self.window_days as f64
    }

    /// Daily expenditure, or `None` when the window has no logged intake
    #[must_use]
    pub fn expenditure(&self, trend_start: f64, trend_end: f64, mean_intake: Option<f64>) -> Option<f64> {
        let rate = self.rate(trend_start, trend_end);
        mean_intake.map(|intake| rate.mul_add(-self.kcal_per_lb, intake))
    }

    /// Summarize the window whose first day is `days[start]`
    ///
    /// The window runs from `start` to `start + window_days` (trend endpoints).
    /// Mean intake averages the logged days among the `window_days` days starting
    /// at `start`, since intake on one day drives the weight change to the next.
    /// Returns `None` when the window does not fit in `days`.
    #[must_use]
    pub fn summarize(&self, days: &[MetabolicDay], start: usize) -> Option<WindowSummary> {
        let end = start.checked_add(self.window_days)?;
        let first = days.get(start)?;
        let last = days.get(end)?;

        let logged: Vec<f64> = days[start..end]
            .iter()
            .filter_map(|day| day.calories_in)
            .collect();
        let mean_intake = if logged.is_empty() {
            None
        } else {
            Some(logged.iter().sum::<f64>() / logged.len() as f64)
        };

        Some(WindowSummary {
            start_date: first.date,
            end_date: last.date,
            trend_start: first.trend_weight,
            trend_end: last.trend_weight,
            rate_lb_per_day: self.rate(first.trend_weight, last.trend_weight),
            mean_intake,
            logged_days: logged.len(),
            expenditure: self.expenditure(first.trend_weight, last.trend_weight, mean_intake),
        })
    }

    /// Summary of the most recent complete window in `days`
    #[must_use]
    pub fn latest(&self, days: &[MetabolicDay]) -> Option<WindowSummary> {
        let start = days.len().checked_sub(self.window_days + 1)?;
        self.summarize(days, start)
    }
}
