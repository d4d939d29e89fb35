// ABOUTME: Core types and constants for the nutriadapt estimation workspace
// ABOUTME: Foundation crate with error handling, domain models, and tuning constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

#![deny(unsafe_code)]

//! # Nutriadapt Core
//!
//! Foundation crate providing shared types and constants for adaptive nutrition
//! estimation. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Default thresholds for the metabolic and nutrient engines
//! - **models**: Weight/intake samples, adaptation events, nutrient estimates and results

/// Unified error handling system with standard error codes
pub mod errors;

/// Default tuning constants organized by engine
pub mod constants;

/// Core data models (samples, adaptation events, nutrient vectors)
pub mod models;
