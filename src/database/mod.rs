// ABOUTME: SQLite persistence for calorie target profiles, body samples, and adaptation events
// ABOUTME: Owns the connection pool and schema migrations; operations live in submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Database Management
//!
//! Identifiers are stored as UUID strings, dates as `YYYY-MM-DD` and timestamps as
//! RFC 3339 text. Each table group keeps its migration next to its queries.

mod adaptation_events;
mod profiles;
mod samples;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::debug;
use uuid::Uuid;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database manager for profiles, samples, and adaptation events
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run migrations
    ///
    /// File databases are created if missing. An in-memory database is pinned to a
    /// single connection so every query sees the same schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &DatabaseUrl) -> AppResult<Self> {
        let pool = match database_url {
            DatabaseUrl::Memory => {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect("sqlite::memory:")
                    .await?
            }
            DatabaseUrl::SQLite { .. } => {
                let connection = format!("{}?mode=rwc", database_url.to_connection_string());
                SqlitePoolOptions::new().connect(&connection).await?
            }
        };

        let db = Self { pool };
        db.migrate().await?;
        debug!(database = %database_url.to_connection_string(), "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_profiles().await?;
        self.migrate_samples().await?;
        self.migrate_adaptation_events().await?;
        Ok(())
    }
}

fn parse_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::database(format!("Invalid UUID '{raw}': {e}")))
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::database(format!("Invalid date '{raw}': {e}")))
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid datetime '{raw}': {e}")))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
