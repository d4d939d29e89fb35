// ABOUTME: End-to-end metabolic assessment from raw samples to an optional adaptation event
// ABOUTME: Alignment, smoothing, expenditure, detection, recalibration; rayon batch over users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use chrono::{DateTime, Utc};
use nutriadapt_core::errors::AppResult;
use nutriadapt_core::models::{AdaptationEvent, IntakeSample, TrendPoint, WeightSample};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::adaptation_detector::{AdaptationDetector, DetectionOutcome};
use super::calorie_recalibrator::CalorieRecalibrator;
use super::daily_series::DailySeries;
use super::energy_balance::{EnergyBalanceEstimator, MetabolicDay, WindowSummary};
use super::trend_smoother::TrendSmoother;
use crate::config::MetabolicConfig;

/// Raw history and current target for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    /// User being assessed
    pub user_id: Uuid,
    /// Current daily calorie target (kcal)
    pub current_calories: i32,
    /// Weight samples in recording order
    pub weights: Vec<WeightSample>,
    /// Daily intake totals
    pub intakes: Vec<IntakeSample>,
}

/// Result of one metabolic assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetabolicAssessment {
    /// User assessed
    pub user_id: Uuid,
    /// Smoothed trend, one point per aligned day
    pub trend: Vec<TrendPoint>,
    /// Energy balance of the most recent complete window
    pub latest_window: Option<WindowSummary>,
    /// Detector outcome, including stable and inconclusive reports
    pub outcome: DetectionOutcome,
    /// Event to append when adaptation was detected
    pub event: Option<AdaptationEvent>,
}

/// Chains the metabolic engines over one user's raw history
#[derive(Debug, Clone)]
pub struct MetabolicPipeline {
    smoother: TrendSmoother,
    estimator: EnergyBalanceEstimator,
    detector: AdaptationDetector,
    recalibrator: CalorieRecalibrator,
}

impl MetabolicPipeline {
    /// Pipeline for validated metabolic settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the settings fail validation
    pub fn new(config: MetabolicConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            smoother: TrendSmoother::from_config(&config)?,
            estimator: EnergyBalanceEstimator::from_config(&config),
            recalibrator: CalorieRecalibrator::from_config(&config),
            detector: AdaptationDetector::new(config),
        })
    }

    /// Settings in use
    #[must_use]
    pub const fn config(&self) -> &MetabolicConfig {
        self.detector.config()
    }

    /// Assess one user's history
    ///
    /// # Errors
    ///
    /// Returns an insufficient-data error when the user has no weight history
    pub fn evaluate(
        &self,
        history: &UserHistory,
        detected_at: DateTime<Utc>,
    ) -> AppResult<MetabolicAssessment> {
        let series = DailySeries::align(&history.weights, &history.intakes);
        let trend = self
            .smoother
            .smooth(series.weights())
            .map_err(|e| e.with_user_id(history.user_id))?;

        let days: Vec<MetabolicDay> = series
            .dates()
            .zip(trend.iter().copied())
            .zip(series.intakes().iter().copied())
            .map(|((date, trend_weight), calories_in)| MetabolicDay {
                date,
                trend_weight,
                calories_in,
            })
            .collect();

        let latest_window = self.estimator.latest(&days);
        let outcome = self.detector.evaluate(&days);
        let event = outcome.signal().map(|signal| {
            self.recalibrator
                .build_event(history.user_id, history.current_calories, signal, detected_at)
        });

        debug!(
            user_id = %history.user_id,
            days = days.len(),
            adapted = event.is_some(),
            "Metabolic assessment complete"
        );

        Ok(MetabolicAssessment {
            user_id: history.user_id,
            trend: days
                .iter()
                .map(|day| TrendPoint {
                    date: day.date,
                    trend_weight: day.trend_weight,
                })
                .collect(),
            latest_window,
            outcome,
            event,
        })
    }

    /// Assess many users in parallel; results keep the input order
    #[must_use]
    pub fn evaluate_batch(
        &self,
        histories: &[UserHistory],
        detected_at: DateTime<Utc>,
    ) -> Vec<(Uuid, AppResult<MetabolicAssessment>)> {
        histories
            .par_iter()
            .map(|history| {
                let result = self.evaluate(history, detected_at);
                if let Err(e) = &result {
                    warn!(user_id = %history.user_id, error = %e, "Metabolic assessment skipped");
                }
                (history.user_id, result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use nutriadapt_core::errors::ErrorCode;

    fn flat_history(days: u64) -> UserHistory {
        let d0 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        UserHistory {
            user_id: Uuid::new_v4(),
            current_calories: 1800,
            weights: (0..days)
                .map(|i| WeightSample::new(d0 + Days::new(i), 180.0))
                .collect(),
            intakes: (0..days)
                .map(|i| IntakeSample::new(d0 + Days::new(i), 1800.0))
                .collect(),
        }
    }

    #[test]
    fn test_flat_history_produces_no_event() {
        let pipeline = MetabolicPipeline::new(MetabolicConfig::default()).unwrap();
        let assessment = pipeline.evaluate(&flat_history(28), Utc::now()).unwrap();
        assert_eq!(assessment.trend.len(), 28);
        assert!(assessment.event.is_none());
        let window = assessment.latest_window.unwrap();
        assert!((window.expenditure.unwrap() - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_weights_is_insufficient_data() {
        let pipeline = MetabolicPipeline::new(MetabolicConfig::default()).unwrap();
        let mut history = flat_history(5);
        history.weights.clear();
        let err = pipeline.evaluate(&history, Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientData);
        assert_eq!(err.context.user_id, Some(history.user_id));
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let pipeline = MetabolicPipeline::new(MetabolicConfig::default()).unwrap();
        let mut broken = flat_history(3);
        broken.weights.clear();
        let histories = vec![flat_history(30), broken.clone(), flat_history(10)];
        let results = pipeline.evaluate_batch(&histories, Utc::now());
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].0, broken.user_id);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MetabolicConfig {
            adapt_floor: 0.5,
            ..MetabolicConfig::default()
        };
        assert!(MetabolicPipeline::new(config).is_err());
    }
}
