// ABOUTME: Reconciles a logged food's AI nutrient estimate against a reference database
// ABOUTME: Bounds the lookup with a timeout and degrades lookup failures to the AI-only tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::sync::Arc;
use std::time::Duration;

use nutriadapt_core::models::{NutrientEstimate, ReconciledNutrientResult, ReferenceFood};
use nutriadapt_intelligence::config::ReconciliationConfig;
use nutriadapt_intelligence::nutrition::NutrientReconciler;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppResult;
use crate::external::ReferenceSource;

/// One food to reconcile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    /// AI nutrient estimate for the food
    pub estimate: NutrientEstimate,
    /// Serving size in grams; the configured default applies when absent
    #[serde(default)]
    pub portion_grams: Option<f64>,
}

/// Reference lookup plus reconciliation for one logged food at a time
#[derive(Clone)]
pub struct NutrientReconciliationService {
    source: Arc<dyn ReferenceSource>,
    reconciler: NutrientReconciler,
    lookup_timeout: Duration,
}

impl NutrientReconciliationService {
    /// Service querying `source` with the given settings and lookup bound
    #[must_use]
    pub fn new(
        source: Arc<dyn ReferenceSource>,
        config: ReconciliationConfig,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            source,
            reconciler: NutrientReconciler::new(config),
            lookup_timeout,
        }
    }

    /// Reconcile the request's estimate
    ///
    /// Lookup errors, timeouts and empty results all yield an `ai_only` result.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a blank name, non-finite or negative
    /// calories, or a bad portion, and a data-quality error for zero calories
    pub async fn reconcile(
        &self,
        request: &ReconciliationRequest,
    ) -> AppResult<ReconciledNutrientResult> {
        NutrientReconciler::validate_estimate(&request.estimate)?;
        let portion = self.reconciler.resolve_portion(request.portion_grams)?;

        let candidates = self.lookup(&request.estimate.name).await;
        self.reconciler
            .reconcile_candidates(&request.estimate, &candidates, Some(portion))
    }

    async fn lookup(&self, name: &str) -> Vec<ReferenceFood> {
        let limit = self.reconciler.config().candidate_limit;
        let source = self.source.source_name();
        match tokio::time::timeout(self.lookup_timeout, self.source.search(name, limit)).await {
            Ok(Ok(mut candidates)) => {
                candidates.truncate(limit as usize);
                debug!(food = name, source, candidates = candidates.len(), "Reference lookup complete");
                candidates
            }
            Ok(Err(e)) => {
                warn!(food = name, source, error = %e, "Reference lookup failed; using AI estimate only");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    food = name,
                    source,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Reference lookup timed out; using AI estimate only"
                );
                Vec::new()
            }
        }
    }
}
