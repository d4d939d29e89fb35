// ABOUTME: Exponential moving average over daily body weight with a configurable half-life
// ABOUTME: Forward-fills missing days with the last raw reading before smoothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use nutriadapt_core::errors::{AppError, AppResult};
use nutriadapt_core::models::{TrendPoint, WeightSample};

use crate::config::MetabolicConfig;

/// EMA trend-weight smoother
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSmoother {
    alpha: f64,
}

impl TrendSmoother {
    /// Smoother for the given half-life in days
    ///
    /// `alpha = 1 - exp(ln(0.5) / half_life)`
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the half-life is not a positive number
    pub fn new(half_life_days: f64) -> AppResult<Self> {
        if !(half_life_days.is_finite() && half_life_days > 0.0) {
            return Err(AppError::invalid_input(format!(
                "trend half-life must be positive, got {half_life_days}"
            )));
        }
        Ok(Self {
            alpha: 1.0 - (0.5_f64.ln() / half_life_days).exp(),
        })
    }

    /// Smoother configured from validated metabolic settings
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the configured half-life is not positive
    pub fn from_config(config: &MetabolicConfig) -> AppResult<Self> {
        Self::new(config.trend_half_life_days)
    }

    /// Smoothing factor applied to each new day
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smooth one value per day, returning an equal-length trend
    ///
    /// # Errors
    ///
    /// Returns an insufficient-data error when the series is empty or its first
    /// day has no weight, since there is no history to fill from
    pub fn smooth(&self, weights: &[Option<f64>]) -> AppResult<Vec<f64>> {
        let Some(Some(first)) = weights.first().copied() else {
            return Err(AppError::insufficient_data(
                "no weight history: the first day of the series has no weigh-in",
            ));
        };

        let mut trend = Vec::with_capacity(weights.len());
        let mut last_raw = first;
        let mut current = first;
        trend.push(current);
        for weight in &weights[1..] {
            if let Some(w) = weight {
                last_raw = *w;
            }
            current = self.alpha.mul_add(last_raw, (1.0 - self.alpha) * current);
            trend.push(current);
        }
        Ok(trend)
    }

    /// Smooth dated samples that already hold one entry per consecutive day
    ///
    /// # Errors
    ///
    /// Same conditions as [`TrendSmoother::smooth`]
    pub fn smooth_samples(&self, samples: &[WeightSample]) -> AppResult<Vec<TrendPoint>> {
        let raw: Vec<Option<f64>> = samples.iter().map(|s| s.weight).collect();
        let trend = self.smooth(&raw)?;
        Ok(samples
            .iter()
            .zip(trend)
            .map(|(sample, trend_weight)| TrendPoint {
                date: sample.date,
                trend_weight,
            })
            .collect())
    }
}
