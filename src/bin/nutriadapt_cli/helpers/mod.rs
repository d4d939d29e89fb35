// ABOUTME: Shared helpers for nutriadapt-cli commands
// ABOUTME: Database connection setup and JSON output on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

pub mod output;

use nutriadapt::config::DatabaseUrl;
use nutriadapt::database::Database;
use nutriadapt::errors::AppResult;
use tracing::info;

/// Connect to the configured database, running migrations
pub async fn connect(database_url: &DatabaseUrl) -> AppResult<Database> {
    info!("Connecting to database: {}", database_url.to_connection_string());
    Database::new(database_url).await
}
