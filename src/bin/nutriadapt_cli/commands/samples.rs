// ABOUTME: Sample import command for nutriadapt-cli
// ABOUTME: Loads weigh-ins and daily intake totals for one user from a JSON file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::path::Path;

use chrono::Utc;
use nutriadapt::database::Database;
use nutriadapt::errors::{AppError, AppResult};
use nutriadapt::models::{IntakeSample, WeightSample};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::helpers::output::print_json;

/// Import file layout
#[derive(Debug, Deserialize)]
struct SampleFile {
    #[serde(default)]
    weights: Vec<WeightSample>,
    #[serde(default)]
    intakes: Vec<IntakeSample>,
}

/// Import `{"weights": [...], "intakes": [...]}` for a user
pub async fn import(database: &Database, user_id: Uuid, path: &Path) -> AppResult<()> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::invalid_input(format!("Cannot read {}: {e}", path.display()))
    })?;
    let file: SampleFile = serde_json::from_str(&raw)?;

    let recorded_at = Utc::now();
    for sample in &file.weights {
        database.record_weight(user_id, sample, recorded_at).await?;
    }
    for sample in &file.intakes {
        database.record_intake(user_id, sample, recorded_at).await?;
    }

    info!(
        user_id = %user_id,
        weights = file.weights.len(),
        intakes = file.intakes.len(),
        "Samples imported"
    );
    print_json(&json!({
        "user_id": user_id,
        "weights_imported": file.weights.len(),
        "intakes_imported": file.intakes.len(),
    }))
}
