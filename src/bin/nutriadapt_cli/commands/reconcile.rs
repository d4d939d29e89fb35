// ABOUTME: Nutrient reconciliation command for nutriadapt-cli
// ABOUTME: Reconciles one AI estimate against USDA FoodData Central or an offline dataset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::path::PathBuf;
use std::sync::Arc;

use nutriadapt::config::ServerConfig;
use nutriadapt::errors::AppResult;
use nutriadapt::external::{
    InMemoryReferenceSource, ReferenceSource, UsdaClientConfig, UsdaReferenceClient,
};
use nutriadapt::models::NutrientEstimate;
use nutriadapt::services::{NutrientReconciliationService, ReconciliationRequest};

use crate::helpers::output::print_json;

/// Where reference candidates come from
pub enum ReferenceChoice {
    /// USDA `FoodData` Central API
    Usda,
    /// JSON dataset file
    Dataset(PathBuf),
    /// Built-in table of common foods
    Builtin,
}

/// Reconcile one estimate and print the result
pub async fn run(
    config: &ServerConfig,
    reference: ReferenceChoice,
    request: ReconciliationRequest,
) -> AppResult<()> {
    let stopwords = config.intelligence.reconciliation.qualifier_stopwords.clone();
    let source: Arc<dyn ReferenceSource> = match reference {
        ReferenceChoice::Usda => Arc::new(UsdaReferenceClient::new(UsdaClientConfig::from(
            &config.reference,
        ))),
        ReferenceChoice::Dataset(path) => Arc::new(
            InMemoryReferenceSource::from_json_file(path)
                .await?
                .with_stopwords(stopwords),
        ),
        ReferenceChoice::Builtin => {
            Arc::new(InMemoryReferenceSource::with_common_foods().with_stopwords(stopwords))
        }
    };

    let service = NutrientReconciliationService::new(
        source,
        config.intelligence.reconciliation.clone(),
        config.reference.lookup_timeout(),
    );
    let result = service.reconcile(&request).await?;
    print_json(&result)
}

/// Build a request from command-line values
#[must_use]
pub fn request_from_args(
    name: String,
    calories: f64,
    macros: [f64; 4],
    confidence: f64,
    portion_grams: Option<f64>,
) -> ReconciliationRequest {
    let [protein_g, carbs_g, fat_g, fiber_g] = macros;
    ReconciliationRequest {
        estimate: NutrientEstimate {
            name,
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g,
            confidence,
        },
        portion_grams,
    }
}
