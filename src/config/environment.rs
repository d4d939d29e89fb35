// ABOUTME: Environment configuration for database location and reference lookup settings
// ABOUTME: Loads .env via dotenvy, parses typed values, and embeds the engine configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use nutriadapt_intelligence::IntelligenceConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

/// Default `FoodData` Central endpoint
pub const DEFAULT_REFERENCE_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` database
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unsupported schemes
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let Some(path_str) = s.strip_prefix("sqlite:") else {
            return Err(AppError::config(format!(
                "Unsupported database URL '{s}': only sqlite: URLs are supported"
            )));
        };
        let path_str = path_str.trim_start_matches("//");
        if path_str == ":memory:" {
            Ok(Self::Memory)
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            })
        }
    }

    /// Connection string for `sqlx`
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("nutriadapt.db"),
        }
    }
}

/// Reference nutrient database client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceApiConfig {
    /// Base URL of the `FoodData` Central API
    pub base_url: String,
    /// API key; the public `DEMO_KEY` is used when absent
    pub api_key: Option<String>,
    /// Upper bound on one lookup (milliseconds)
    pub lookup_timeout_ms: u64,
    /// Search cache lifetime (seconds)
    pub cache_ttl_secs: u64,
}

impl ReferenceApiConfig {
    /// Lookup timeout as a `Duration`
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Default for ReferenceApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REFERENCE_BASE_URL.into(),
            api_key: None,
            lookup_timeout_ms: 2000,
            cache_ttl_secs: 86_400,
        }
    }
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Database location
    pub database_url: DatabaseUrl,
    /// Reference lookup settings
    pub reference: ReferenceApiConfig,
    /// Engine thresholds
    pub intelligence: IntelligenceConfig,
}

impl ServerConfig {
    /// Load configuration from `.env` and process environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a variable is present but malformed or the
    /// engine thresholds fail validation
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => DatabaseUrl::parse_url(&url)?,
            Err(_) => DatabaseUrl::default(),
        };

        let defaults = ReferenceApiConfig::default();
        let reference = ReferenceApiConfig {
            base_url: env::var("REFERENCE_API_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("REFERENCE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            lookup_timeout_ms: env_parse("REFERENCE_LOOKUP_TIMEOUT_MS", defaults.lookup_timeout_ms)?,
            cache_ttl_secs: env_parse("REFERENCE_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
        };

        // REFERENCE_CANDIDATE_LIMIT sets the same knob as NUTRIADAPT_CANDIDATE_LIMIT
        let mut intelligence = IntelligenceConfig::load()?;
        intelligence.reconciliation.candidate_limit = env_parse(
            "REFERENCE_CANDIDATE_LIMIT",
            intelligence.reconciliation.candidate_limit,
        )?;
        intelligence.validate()?;

        info!(
            database = %database_url.to_connection_string(),
            reference.base_url = %reference.base_url,
            reference.api_key_present = reference.api_key.is_some(),
            reference.timeout_ms = reference.lookup_timeout_ms,
            reference.candidate_limit = intelligence.reconciliation.candidate_limit,
            "Configuration loaded from environment"
        );

        Ok(Self {
            database_url,
            reference,
            intelligence,
        })
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {key}: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
