// ABOUTME: Core data models for metabolic tracking and nutrient reconciliation
// ABOUTME: Re-exports samples, adaptation events, calorie target profiles, and nutrient vectors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Data Models
//!
//! - `WeightSample` / `IntakeSample`: raw daily inputs for one user
//! - `TrendPoint`: derived, EMA-smoothed weight for one day
//! - `AdaptationEvent`: append-only record of a detected adaptation and its recalibration
//! - `CalorieTargetProfile`: the user's live calorie target with idempotent event application
//! - `NutrientEstimate` / `ReferenceFood` / `ReconciledNutrientResult`: nutrient pipeline values

/// Weight, intake, trend, and adaptation event models
pub mod metabolic;

/// Nutrient estimate, reference food, and reconciled result models
pub mod nutrition;

/// Live calorie target owned by the user's profile
pub mod profile;

pub use metabolic::{AdaptationEvent, AdaptationType, IntakeSample, TrendPoint, WeightSample};
pub use nutrition::{
    NutrientEstimate, NutrientProfile, NutrientSource, ReconciledNutrientResult, ReferenceFood,
};
pub use profile::{ApplyOutcome, CalorieTargetProfile};
