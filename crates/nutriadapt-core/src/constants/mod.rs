// ABOUTME: Default tuning constants for metabolic adaptation and nutrient reconciliation
// ABOUTME: Heuristic thresholds preserved exactly; configuration layers may override them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! Constants module
//!
//! The thresholds below are product heuristics without a cited derivation. They are
//! kept verbatim as defaults and surfaced through configuration rather than tuned here.

/// Metabolic trend and adaptation defaults
pub mod metabolic {
    /// EMA half-life for trend weight (days)
    pub const TREND_HALF_LIFE_DAYS: f64 = 7.0;

    /// Energy content of one pound of body mass (kcal)
    pub const KCAL_PER_LB: f64 = 3500.0;

    /// Length of each comparison window (days)
    pub const WINDOW_DAYS: usize = 7;

    /// Minimum aligned history before adaptation can be evaluated (days)
    pub const MIN_DAYS_FOR_UPDATE: usize = 28;

    /// 1-based day on which the early window starts
    pub const EARLY_WINDOW_START_DAY: usize = 7;

    /// 1-based day on which the recent window starts
    pub const RECENT_WINDOW_START_DAY: usize = 21;

    /// Intake must change by strictly less than this between windows (kcal/day)
    pub const INTAKE_STABILITY_BAND_KCAL: f64 = 200.0;

    /// Minimum early-window rate magnitude that counts as real loss or gain (lb/day)
    pub const RATE_FLOOR_LB_PER_DAY: f64 = 0.1;

    /// Minimum change in rate between windows (lb/day)
    pub const RATE_CHANGE_FLOOR_LB_PER_DAY: f64 = 0.05;

    /// Lower clamp for adaptation magnitude
    pub const ADAPT_FLOOR: f64 = 0.10;

    /// Upper clamp for adaptation magnitude
    pub const ADAPT_CEILING: f64 = 0.25;

    /// Absolute minimum daily calorie target (kcal)
    pub const CALORIE_FLOOR: i32 = 1200;
}

/// Nutrient reconciliation defaults
pub mod reconciliation {
    /// Weight of name similarity in match confidence
    pub const NAME_WEIGHT: f64 = 0.7;

    /// Weight of calorie similarity in match confidence
    pub const CALORIE_WEIGHT: f64 = 0.3;

    /// Relative calorie error at which calorie similarity reaches zero
    pub const CALORIE_TOLERANCE: f64 = 0.3;

    /// Match confidence below which the AI estimate is used alone
    pub const AI_ONLY_THRESHOLD: f64 = 0.6;

    /// Match confidence above which the reference replaces the estimate
    pub const VERIFIED_THRESHOLD: f64 = 0.8;

    /// Minimum confidence reported for blended results
    pub const BLENDED_CONFIDENCE_FLOOR: f64 = 0.75;

    /// Reference databases report nutrients per this many grams
    pub const REFERENCE_BASIS_GRAMS: f64 = 100.0;

    /// Portion assumed when the caller does not supply one (grams)
    pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;

    /// Number of reference candidates kept for scoring
    pub const CANDIDATE_LIMIT: u32 = 10;

    /// Largest page of candidates a reference search may request
    pub const MAX_CANDIDATE_LIMIT: u32 = 200;

    /// Tokens ignored when comparing food names
    pub const QUALIFIER_STOPWORDS: &[&str] = &[
        "a", "an", "and", "as", "in", "of", "or", "the", "with", "raw", "fresh", "plain", "nfs",
        "ns",
    ];
}
