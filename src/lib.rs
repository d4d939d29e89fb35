// ABOUTME: Main library entry point for the adaptive nutrition estimation services
// ABOUTME: Wires the metabolic and nutrient engines to configuration, storage, and reference lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

#![deny(unsafe_code)]

//! # Nutriadapt
//!
//! Boundary layer around the `nutriadapt-intelligence` engines:
//!
//! - **Metabolic adaptation**: weekly checks over stored weigh-ins and intake,
//!   appending adaptation events and applying them to a calorie target exactly once
//! - **Nutrient reconciliation**: per-food lookup in a reference database under a
//!   timeout, then three-tier reconciliation of the AI estimate
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriadapt::config::ServerConfig;
//! use nutriadapt::database::Database;
//! use nutriadapt::errors::AppResult;
//! use nutriadapt::services::AdaptationService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database_url).await?;
//!     let service = AdaptationService::new(database, config.intelligence.metabolic)?;
//!     let report = service.run_weekly_batch(chrono::Utc::now()).await?;
//!     println!("{} users checked", report.checked);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// `SQLite` persistence for profiles, samples, and adaptation events
pub mod database;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Reference nutrient database sources
pub mod external;

/// Adaptation event explanations
pub mod formatters;

/// Structured logging setup
pub mod logging;

/// Domain services invoked by write paths
pub mod services;

pub use nutriadapt_core::models;
