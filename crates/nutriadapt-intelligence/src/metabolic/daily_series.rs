// ABOUTME: Aligns sparse weight and intake samples onto one row per calendar day
// ABOUTME: Later corrections for a day override earlier ones; unlogged days stay empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use nutriadapt_core::models::{IntakeSample, WeightSample};
use tracing::warn;

/// One user's history with exactly one row per calendar day
///
/// The series runs from the earliest sample date of either kind to the latest one.
/// A leading day without a weigh-in stays `None` so the trend smoother can reject it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySeries {
    start: Option<NaiveDate>,
    weights: Vec<Option<f64>>,
    intakes: Vec<Option<f64>>,
}

impl DailySeries {
    /// Build a daily series from raw samples in recording order
    ///
    /// When a date appears more than once the last recorded value wins. Weight
    /// readings that are non-finite or non-positive are ignored.
    #[must_use]
    pub fn align(weights: &[WeightSample], intakes: &[IntakeSample]) -> Self {
        let mut weight_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for sample in weights {
            match sample.weight {
                Some(w) if w.is_finite() && w > 0.0 => {
                    weight_by_day.insert(sample.date, w);
                }
                Some(w) => warn!(date = %sample.date, weight = w, "Ignoring implausible weight sample"),
                None => {}
            }
        }

        let mut intake_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for sample in intakes {
            if sample.calories_in.is_finite() && sample.calories_in >= 0.0 {
                intake_by_day.insert(sample.date, sample.calories_in);
            } else {
                warn!(date = %sample.date, calories_in = sample.calories_in, "Ignoring implausible intake sample");
            }
        }

        let sample_dates = || {
            weights
                .iter()
                .map(|s| s.date)
                .chain(intake_by_day.keys().copied())
        };
        let (Some(start), Some(end)) = (sample_dates().min(), sample_dates().max()) else {
            return Self::default();
        };

        let len = (end - start).num_days() as usize + 1;
        let mut series = Self {
            start: Some(start),
            weights: vec![None; len],
            intakes: vec![None; len],
        };
        for (date, w) in &weight_by_day {
            series.weights[(*date - start).num_days() as usize] = Some(*w);
        }
        for (date, kcal) in &intake_by_day {
            series.intakes[(*date - start).num_days() as usize] = Some(*kcal);
        }
        series
    }

    /// Number of days covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the series covers no days
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// First calendar day of the series
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Calendar day at row `index`
    #[must_use]
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.start
            .and_then(|start| start.checked_add_days(Days::new(index as u64)))
    }

    /// All calendar days in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.len()).filter_map(|i| self.date_at(i))
    }

    /// Daily weights (`None` for days without a weigh-in)
    #[must_use]
    pub fn weights(&self) -> &[Option<f64>] {
        &self.weights
    }

    /// Daily intakes (`None` for unlogged days)
    #[must_use]
    pub fn intakes(&self) -> &[Option<f64>] {
        &self.intakes
    }

    /// The last `n` days (or the whole series when shorter)
    #[must_use]
    pub fn tail(&self, n: usize) -> Self {
        let skip = self.len().saturating_sub(n);
        Self {
            start: self.date_at(skip),
            weights: self.weights[skip..].to_vec(),
            intakes: self.intakes[skip..].to_vec(),
        }
    }
}
