// ABOUTME: Reference nutrient database sources (USDA FoodData Central and in-memory datasets)
// ABOUTME: Defines the ReferenceSource lookup seam used by nutrient reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! External Reference Sources
//!
//! A reference source answers "which verified foods might this name refer to?".
//! Results are candidates in the source's own relevance order; the reconciliation
//! engine rescores them and never trusts that order.

/// Seeded or file-backed reference dataset
pub mod in_memory;
/// USDA `FoodData` Central API client
pub mod usda_client;

pub use in_memory::InMemoryReferenceSource;
pub use usda_client::{UsdaClientConfig, UsdaReferenceClient};

use async_trait::async_trait;
use nutriadapt_core::models::ReferenceFood;

use crate::errors::AppResult;

/// Lookup of reference food candidates by name
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Up to `limit` candidates for `name`, nutrients per 100 g
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be reached or answers with
    /// malformed data
    async fn search(&self, name: &str, limit: u32) -> AppResult<Vec<ReferenceFood>>;

    /// Short name used in logs
    fn source_name(&self) -> &'static str;
}
