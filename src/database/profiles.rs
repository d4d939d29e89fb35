// ABOUTME: Calorie target profile storage keyed by user id
// ABOUTME: Loads profiles together with the ids of adaptation events already applied to them

use std::collections::BTreeSet;

use chrono::Utc;
use nutriadapt_core::models::CalorieTargetProfile;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::{parse_uuid, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS calorie_profiles (
                user_id TEXT PRIMARY KEY,
                daily_calories INTEGER NOT NULL CHECK (daily_calories > 0),
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create the profile or overwrite its daily calorie target
    ///
    /// This is the manual edit path; adaptation events use
    /// [`Database::apply_adaptation_event`] instead.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a non-positive target, or a database error
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        daily_calories: i32,
    ) -> AppResult<CalorieTargetProfile> {
        if daily_calories <= 0 {
            return Err(AppError::invalid_input(format!(
                "daily calorie target must be positive, got {daily_calories}"
            ))
            .with_user_id(user_id));
        }

        sqlx::query(
            r"
            INSERT INTO calorie_profiles (user_id, daily_calories, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(user_id) DO UPDATE SET
                daily_calories = excluded.daily_calories,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id.to_string())
        .bind(daily_calories)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile {user_id}")))
    }

    /// Get a profile with its applied event ids
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<CalorieTargetProfile>> {
        let mut conn = self.pool.acquire().await?;
        load_profile(&mut conn, user_id).await
    }

    /// Ids of every user with a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_profile_user_ids(&self) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query("SELECT user_id FROM calorie_profiles ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| parse_uuid(&row.get::<String, _>("user_id")))
            .collect()
    }
}

/// Load a profile on an existing connection so transactions can reuse it
pub(super) async fn load_profile(
    conn: &mut SqliteConnection,
    user_id: Uuid,
) -> AppResult<Option<CalorieTargetProfile>> {
    let Some(row) = sqlx::query("SELECT daily_calories FROM calorie_profiles WHERE user_id = $1")
        .bind(user_id.to_string())
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };
    let daily_calories: i32 = row.get("daily_calories");

    let applied = sqlx::query(
        r"
        SELECT id FROM adaptation_events
        WHERE user_id = $1 AND applied_at IS NOT NULL
        ",
    )
    .bind(user_id.to_string())
    .fetch_all(&mut *conn)
    .await?;

    let applied_event_ids = applied
        .iter()
        .map(|row| parse_uuid(&row.get::<String, _>("id")))
        .collect::<AppResult<BTreeSet<Uuid>>>()?;

    Ok(Some(CalorieTargetProfile {
        user_id,
        daily_calories,
        applied_event_ids,
    }))
}
