// ABOUTME: Weight and intake sample storage feeding the metabolic pipeline
// ABOUTME: Weigh-ins are append-only corrections; intake is one upserted total per day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use chrono::{DateTime, Utc};
use nutriadapt_core::models::{IntakeSample, WeightSample};
use sqlx::Row;
use uuid::Uuid;

use super::{format_date, parse_date, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_samples(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weight_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                sample_date TEXT NOT NULL,
                weight_lb REAL,
                recorded_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS intake_samples (
                user_id TEXT NOT NULL,
                sample_date TEXT NOT NULL,
                calories_in REAL NOT NULL,
                recorded_at TEXT NOT NULL,
                PRIMARY KEY (user_id, sample_date)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_weight_samples_user_date ON weight_samples(user_id, sample_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a weigh-in; a later row for the same date supersedes earlier ones
    ///
    /// `None` records an explicitly skipped weigh-in.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a non-finite or non-positive weight
    pub async fn record_weight(
        &self,
        user_id: Uuid,
        sample: &WeightSample,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(weight) = sample.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(AppError::invalid_input(format!(
                    "weight for {} must be a positive number, got {weight}",
                    sample.date
                ))
                .with_user_id(user_id));
            }
        }

        sqlx::query(
            r"
            INSERT INTO weight_samples (user_id, sample_date, weight_lb, recorded_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user_id.to_string())
        .bind(format_date(sample.date))
        .bind(sample.weight)
        .bind(recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Weigh-ins in date order, corrections after the rows they supersede
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored date is malformed
    pub async fn weight_series(&self, user_id: Uuid) -> AppResult<Vec<WeightSample>> {
        let rows = sqlx::query(
            r"
            SELECT sample_date, weight_lb FROM weight_samples
            WHERE user_id = $1
            ORDER BY sample_date, recorded_at, id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(WeightSample {
                    date: parse_date(&row.get::<String, _>("sample_date"))?,
                    weight: row.get::<Option<f64>, _>("weight_lb"),
                })
            })
            .collect()
    }

    /// Set the day's total calories consumed
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a negative or non-finite total
    pub async fn record_intake(
        &self,
        user_id: Uuid,
        sample: &IntakeSample,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if !sample.calories_in.is_finite() || sample.calories_in < 0.0 {
            return Err(AppError::invalid_input(format!(
                "calories for {} must be a non-negative number, got {}",
                sample.date, sample.calories_in
            ))
            .with_user_id(user_id));
        }

        sqlx::query(
            r"
            INSERT INTO intake_samples (user_id, sample_date, calories_in, recorded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(user_id, sample_date) DO UPDATE SET
                calories_in = excluded.calories_in,
                recorded_at = excluded.recorded_at
            ",
        )
        .bind(user_id.to_string())
        .bind(format_date(sample.date))
        .bind(sample.calories_in)
        .bind(recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Daily intake totals in date order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored date is malformed
    pub async fn intake_series(&self, user_id: Uuid) -> AppResult<Vec<IntakeSample>> {
        let rows = sqlx::query(
            r"
            SELECT sample_date, calories_in FROM intake_samples
            WHERE user_id = $1
            ORDER BY sample_date
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(IntakeSample::new(
                    parse_date(&row.get::<String, _>("sample_date"))?,
                    row.get::<f64, _>("calories_in"),
                ))
            })
            .collect()
    }
}
