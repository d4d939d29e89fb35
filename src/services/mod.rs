// ABOUTME: Domain services invoked explicitly by write paths and the CLI
// ABOUTME: Weekly adaptation checks with idempotent apply, and per-request nutrient reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! Domain services
//!
//! Services wire the pure engines to persistence and reference lookups. Nothing
//! here runs as a side effect of storing data; callers invoke each operation.

/// Weekly metabolic adaptation checks and the apply step
pub mod adaptation;
/// Reference lookup plus reconciliation for logged foods
pub mod nutrient_reconciliation;

pub use adaptation::{AdaptationService, WeeklyBatchEntry, WeeklyBatchReport};
pub use nutrient_reconciliation::{NutrientReconciliationService, ReconciliationRequest};
