// ABOUTME: Engine configuration for metabolic adaptation and nutrient reconciliation
// ABOUTME: Orchestrates domain configs and provides unified validation and environment loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! Intelligence Configuration Module
//!
//! Every heuristic threshold used by the engines lives here with its default
//! preserved exactly. Values can be overridden through `NUTRIADAPT_*` environment
//! variables and are validated before use.

/// Configuration error types
pub mod error;
/// Metabolic engine configuration
pub mod metabolic;
/// Nutrient reconciliation configuration
pub mod reconciliation;

pub use error::ConfigError;
pub use metabolic::MetabolicConfig;
pub use reconciliation::ReconciliationConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration singleton
static INTELLIGENCE_CONFIG: OnceLock<IntelligenceConfig> = OnceLock::new();

/// Environment variable holding a comma-separated qualifier stop-list
pub const STOPWORDS_ENV_VAR: &str = "NUTRIADAPT_QUALIFIER_STOPWORDS";

/// Main engine configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Trend, energy balance, detection, and recalibration settings
    pub metabolic: MetabolicConfig,
    /// Reference matching and tier settings
    pub reconciliation: ReconciliationConfig,
}

impl IntelligenceConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        INTELLIGENCE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load intelligence config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first validation failure from either engine section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metabolic.validate()?;
        self.reconciliation.validate()
    }

    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        let m = &mut self.metabolic;
        Self::apply_env_var("NUTRIADAPT_TREND_HALF_LIFE_DAYS", &mut m.trend_half_life_days)?;
        Self::apply_env_var("NUTRIADAPT_KCAL_PER_LB", &mut m.kcal_per_lb)?;
        Self::apply_env_var("NUTRIADAPT_WINDOW_DAYS", &mut m.window_days)?;
        Self::apply_env_var("NUTRIADAPT_MIN_DAYS_FOR_UPDATE", &mut m.min_days_for_update)?;
        Self::apply_env_var(
            "NUTRIADAPT_EARLY_WINDOW_START_DAY",
            &mut m.early_window_start_day,
        )?;
        Self::apply_env_var(
            "NUTRIADAPT_RECENT_WINDOW_START_DAY",
            &mut m.recent_window_start_day,
        )?;
        Self::apply_env_var(
            "NUTRIADAPT_INTAKE_STABILITY_BAND_KCAL",
            &mut m.intake_stability_band_kcal,
        )?;
        Self::apply_env_var("NUTRIADAPT_RATE_FLOOR_LB_PER_DAY", &mut m.rate_floor_lb_per_day)?;
        Self::apply_env_var(
            "NUTRIADAPT_RATE_CHANGE_FLOOR_LB_PER_DAY",
            &mut m.rate_change_floor_lb_per_day,
        )?;
        Self::apply_env_var("NUTRIADAPT_ADAPT_FLOOR", &mut m.adapt_floor)?;
        Self::apply_env_var("NUTRIADAPT_ADAPT_CEILING", &mut m.adapt_ceiling)?;
        Self::apply_env_var("NUTRIADAPT_CALORIE_FLOOR", &mut m.calorie_floor)?;

        let r = &mut self.reconciliation;
        Self::apply_env_var("NUTRIADAPT_NAME_WEIGHT", &mut r.name_weight)?;
        Self::apply_env_var("NUTRIADAPT_CALORIE_WEIGHT", &mut r.calorie_weight)?;
        Self::apply_env_var("NUTRIADAPT_CALORIE_TOLERANCE", &mut r.calorie_tolerance)?;
        Self::apply_env_var("NUTRIADAPT_AI_ONLY_THRESHOLD", &mut r.ai_only_threshold)?;
        Self::apply_env_var("NUTRIADAPT_VERIFIED_THRESHOLD", &mut r.verified_threshold)?;
        Self::apply_env_var(
            "NUTRIADAPT_BLENDED_CONFIDENCE_FLOOR",
            &mut r.blended_confidence_floor,
        )?;
        Self::apply_env_var(
            "NUTRIADAPT_DEFAULT_PORTION_GRAMS",
            &mut r.default_portion_grams,
        )?;
        Self::apply_env_var("NUTRIADAPT_CANDIDATE_LIMIT", &mut r.candidate_limit)?;

        if let Ok(list) = env::var(STOPWORDS_ENV_VAR) {
            r.qualifier_stopwords = list
                .split(',')
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect();
        }

        Ok(self)
    }
}
