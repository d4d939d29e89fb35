// ABOUTME: Append-only adaptation event log, one event per user and week, and the idempotent apply step
// ABOUTME: Applying an event marks it and sets the profile target inside one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use chrono::{NaiveDate, Utc};
use nutriadapt_core::models::{AdaptationEvent, AdaptationType, ApplyOutcome};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use uuid::Uuid;

use super::profiles::load_profile;
use super::{format_date, parse_date, parse_timestamp, parse_uuid, Database};
use crate::errors::{AppError, AppResult};

const EVENT_COLUMNS: &str = r"
    id, user_id, detected_at, week_start_date, adaptation_type, magnitude,
    old_calories, new_calories, old_expenditure_estimate, new_expenditure_estimate
";

impl Database {
    pub(super) async fn migrate_adaptation_events(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS adaptation_events (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                detected_at TEXT NOT NULL,
                week_start_date TEXT NOT NULL,
                adaptation_type TEXT NOT NULL CHECK (adaptation_type IN ('deficit_stall', 'surplus_slow', 'stable')),
                magnitude REAL NOT NULL,
                old_calories INTEGER NOT NULL,
                new_calories INTEGER NOT NULL,
                old_expenditure_estimate REAL NOT NULL,
                new_expenditure_estimate REAL NOT NULL,
                applied_at TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_adaptation_events_user ON adaptation_events(user_id, detected_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_adaptation_events_user_week ON adaptation_events(user_id, week_start_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append an adaptation event unless the user already has one for that week
    ///
    /// Returns `false` when an event for the same `(user_id, week_start_date)` was
    /// already stored; the existing row is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails, including a duplicate id
    pub async fn insert_adaptation_event(&self, event: &AdaptationEvent) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO adaptation_events (
                id, user_id, detected_at, week_start_date, adaptation_type, magnitude,
                old_calories, new_calories, old_expenditure_estimate, new_expenditure_estimate
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, week_start_date) DO NOTHING
            ",
        )
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .bind(event.detected_at.to_rfc3339())
        .bind(format_date(event.week_start_date))
        .bind(event.adaptation_type.as_str())
        .bind(event.magnitude)
        .bind(event.old_calories)
        .bind(event.new_calories)
        .bind(event.old_expenditure_estimate)
        .bind(event.new_expenditure_estimate)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to record adaptation event: {e}"))
                .with_user_id(event.user_id)
                .with_resource_id(event.id.to_string())
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// The event stored for a user's week, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed
    pub async fn find_adaptation_event_for_week(
        &self,
        user_id: Uuid,
        week_start_date: NaiveDate,
    ) -> AppResult<Option<AdaptationEvent>> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM adaptation_events WHERE user_id = $1 AND week_start_date = $2"
        ))
        .bind(user_id.to_string())
        .bind(format_date(week_start_date))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_event).transpose()
    }

    /// Get an adaptation event by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed
    pub async fn get_adaptation_event(&self, event_id: Uuid) -> AppResult<Option<AdaptationEvent>> {
        let mut conn = self.pool.acquire().await?;
        fetch_event(&mut conn, event_id).await
    }

    /// A user's events, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed
    pub async fn list_adaptation_events(&self, user_id: Uuid) -> AppResult<Vec<AdaptationEvent>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM adaptation_events WHERE user_id = $1 ORDER BY detected_at DESC, id"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_event).collect()
    }

    /// Set the owner's calorie target from the event, at most once per event
    ///
    /// The event row is claimed with a conditional update and the profile target is
    /// written in the same transaction, so a redelivered apply is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the event or its owner's profile does not exist
    pub async fn apply_adaptation_event(&self, event_id: Uuid) -> AppResult<ApplyOutcome> {
        let mut tx = self.pool.begin().await?;

        let event = fetch_event(&mut tx, event_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Adaptation event {event_id}")))?;
        let mut profile = load_profile(&mut tx, event.user_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Profile {}", event.user_id)).with_user_id(event.user_id)
        })?;

        let outcome = profile.apply_event(&event)?;
        if matches!(outcome, ApplyOutcome::AlreadyApplied { .. }) {
            return Ok(outcome);
        }

        let now = Utc::now().to_rfc3339();
        let claimed = sqlx::query(
            "UPDATE adaptation_events SET applied_at = $1 WHERE id = $2 AND applied_at IS NULL",
        )
        .bind(&now)
        .bind(event_id.to_string())
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Ok(ApplyOutcome::AlreadyApplied {
                daily_calories: profile.daily_calories,
            });
        }

        sqlx::query(
            "UPDATE calorie_profiles SET daily_calories = $1, updated_at = $2 WHERE user_id = $3",
        )
        .bind(event.new_calories)
        .bind(&now)
        .bind(event.user_id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(outcome)
    }
}

async fn fetch_event(
    conn: &mut SqliteConnection,
    event_id: Uuid,
) -> AppResult<Option<AdaptationEvent>> {
    let row = sqlx::query(&format!(
        "SELECT {EVENT_COLUMNS} FROM adaptation_events WHERE id = $1"
    ))
    .bind(event_id.to_string())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(row_to_event).transpose()
}

fn row_to_event(row: &SqliteRow) -> AppResult<AdaptationEvent> {
    let kind: String = row.get("adaptation_type");
    let adaptation_type = AdaptationType::from_db_str(&kind)
        .ok_or_else(|| AppError::database(format!("Unknown adaptation type '{kind}'")))?;

    Ok(AdaptationEvent {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        user_id: parse_uuid(&row.get::<String, _>("user_id"))?,
        detected_at: parse_timestamp(&row.get::<String, _>("detected_at"))?,
        week_start_date: parse_date(&row.get::<String, _>("week_start_date"))?,
        adaptation_type,
        magnitude: row.get("magnitude"),
        old_calories: row.get("old_calories"),
        new_calories: row.get("new_calories"),
        old_expenditure_estimate: row.get("old_expenditure_estimate"),
        new_expenditure_estimate: row.get("new_expenditure_estimate"),
    })
}
