// ABOUTME: Calorie target profile commands for nutriadapt-cli
// ABOUTME: Sets and shows a user's daily calorie target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use nutriadapt::database::Database;
use nutriadapt::errors::{AppError, AppResult};
use tracing::info;
use uuid::Uuid;

use crate::helpers::output::print_json;

/// Create or overwrite a profile's daily target
pub async fn set(database: &Database, user_id: Uuid, daily_calories: i32) -> AppResult<()> {
    let profile = database.upsert_profile(user_id, daily_calories).await?;
    info!(user_id = %user_id, daily_calories, "Profile target set");
    print_json(&profile)
}

/// Print a profile
pub async fn show(database: &Database, user_id: Uuid) -> AppResult<()> {
    let profile = database
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {user_id}")))?;
    print_json(&profile)
}
