// ABOUTME: Adaptive nutrition engines for metabolic adaptation and nutrient reconciliation
// ABOUTME: Pure, synchronous algorithms plus their validated configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

#![deny(unsafe_code)]

//! # Nutriadapt Intelligence
//!
//! Two engines that estimate a true value from noisy, partial signals and combine
//! them conservatively within hard safety bounds:
//!
//! - **metabolic**: EMA trend weight, energy-balance expenditure, two-window
//!   adaptation detection, and floor-bounded calorie recalibration
//! - **nutrition**: reference candidate scoring and three-tier reconciliation of
//!   AI nutrient estimates
//!
//! Nothing here performs I/O. Lookups, persistence, and timeouts live in the
//! `nutriadapt` crate.

/// Engine thresholds with validation and environment overrides
pub mod config;

/// Metabolic adaptation engine
pub mod metabolic;

/// Nutrient reconciliation engine
pub mod nutrition;

pub use config::{ConfigError, IntelligenceConfig, MetabolicConfig, ReconciliationConfig};
