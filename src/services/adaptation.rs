// ABOUTME: Weekly metabolic adaptation service over stored samples and calorie profiles
// ABOUTME: Runs the metabolic pipeline, records one event per user and week, and applies events idempotently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nutriadapt_core::models::ApplyOutcome;
use nutriadapt_intelligence::config::MetabolicConfig;
use nutriadapt_intelligence::metabolic::{MetabolicAssessment, MetabolicPipeline, UserHistory};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};

/// Outcome of one user's check inside a batch run
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyBatchEntry {
    /// User checked
    pub user_id: Uuid,
    /// Assessment, when the user could be evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<MetabolicAssessment>,
    /// Why the user was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a batch run across every profile
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyBatchReport {
    /// Users evaluated
    pub checked: usize,
    /// Users for which an event was recorded
    pub adapted: usize,
    /// Users skipped because of an error
    pub failed: usize,
    /// Per-user results
    pub entries: Vec<WeeklyBatchEntry>,
}

/// Weekly adaptation checks backed by the database
#[derive(Clone)]
pub struct AdaptationService {
    database: Database,
    pipeline: Arc<MetabolicPipeline>,
}

impl AdaptationService {
    /// Service over `database` using the given metabolic settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the settings fail validation
    pub fn new(database: Database, config: MetabolicConfig) -> AppResult<Self> {
        Ok(Self {
            database,
            pipeline: Arc::new(MetabolicPipeline::new(config)?),
        })
    }

    /// Stored history and current target for one user
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user has no calorie profile
    pub async fn load_history(&self, user_id: Uuid) -> AppResult<UserHistory> {
        let profile = self.database.get_profile(user_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Profile {user_id}")).with_user_id(user_id)
        })?;
        Ok(UserHistory {
            user_id,
            current_calories: profile.daily_calories,
            weights: self.database.weight_series(user_id).await?,
            intakes: self.database.intake_series(user_id).await?,
        })
    }

    /// Evaluate one user and append the event if adaptation was detected
    ///
    /// The profile target is not changed here; see [`AdaptationService::apply_event`].
    ///
    /// # Errors
    ///
    /// Returns a not-found error without a profile, an insufficient-data error
    /// without weight history, or a database error if the event cannot be stored
    pub async fn run_weekly_check(
        &self,
        user_id: Uuid,
        detected_at: DateTime<Utc>,
    ) -> AppResult<MetabolicAssessment> {
        let history = self.load_history(user_id).await?;
        let mut assessment = self.pipeline.evaluate(&history, detected_at)?;
        self.record(&mut assessment).await?;
        Ok(assessment)
    }

    /// Evaluate every profile; histories are assessed in parallel
    ///
    /// A failure for one user is reported in its entry and does not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error only if the profile list cannot be read or the worker
    /// thread fails
    pub async fn run_weekly_batch(&self, detected_at: DateTime<Utc>) -> AppResult<WeeklyBatchReport> {
        let user_ids = self.database.list_profile_user_ids().await?;
        let mut entries = Vec::with_capacity(user_ids.len());
        let mut histories = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            match self.load_history(user_id).await {
                Ok(history) => histories.push(history),
                Err(e) => entries.push(failed_entry(user_id, &e)),
            }
        }

        let pipeline = Arc::clone(&self.pipeline);
        let results = tokio::task::spawn_blocking(move || pipeline.evaluate_batch(&histories, detected_at))
            .await
            .map_err(|e| AppError::internal(format!("Batch evaluation worker failed: {e}")))?;

        for (user_id, result) in results {
            let entry = match result {
                Ok(mut assessment) => match self.record(&mut assessment).await {
                    Ok(()) => WeeklyBatchEntry {
                        user_id,
                        assessment: Some(assessment),
                        error: None,
                    },
                    Err(e) => failed_entry(user_id, &e),
                },
                Err(e) => failed_entry(user_id, &e),
            };
            entries.push(entry);
        }

        let report = WeeklyBatchReport {
            checked: entries.len(),
            adapted: entries
                .iter()
                .filter(|e| e.assessment.as_ref().is_some_and(|a| a.event.is_some()))
                .count(),
            failed: entries.iter().filter(|e| e.error.is_some()).count(),
            entries,
        };
        info!(
            checked = report.checked,
            adapted = report.adapted,
            failed = report.failed,
            "Weekly adaptation batch complete"
        );
        Ok(report)
    }

    /// Apply a recorded event to its owner's calorie target, at most once
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the event or profile does not exist
    pub async fn apply_event(&self, event_id: Uuid) -> AppResult<ApplyOutcome> {
        let outcome = self.database.apply_adaptation_event(event_id).await?;
        match outcome {
            ApplyOutcome::Applied {
                previous_calories,
                daily_calories,
            } => info!(
                event_id = %event_id,
                previous_calories,
                daily_calories,
                "Adaptation event applied"
            ),
            ApplyOutcome::AlreadyApplied { daily_calories } => info!(
                event_id = %event_id,
                daily_calories,
                "Adaptation event already applied"
            ),
        }
        Ok(outcome)
    }

    /// Store the detected event; a re-run for a week already on record returns the stored one
    async fn record(&self, assessment: &mut MetabolicAssessment) -> AppResult<()> {
        let Some(event) = &assessment.event else {
            return Ok(());
        };
        if !self.database.insert_adaptation_event(event).await? {
            let existing = self
                .database
                .find_adaptation_event_for_week(event.user_id, event.week_start_date)
                .await?
                .ok_or_else(|| {
                    AppError::database(format!(
                        "Adaptation event for week {} vanished after conflict",
                        event.week_start_date
                    ))
                    .with_user_id(event.user_id)
                })?;
            info!(
                user_id = %existing.user_id,
                event_id = %existing.id,
                week_start_date = %existing.week_start_date,
                "Adaptation event already recorded for week"
            );
            assessment.event = Some(existing);
            return Ok(());
        }
        info!(
            user_id = %event.user_id,
            event_id = %event.id,
            adaptation_type = event.adaptation_type.as_str(),
            magnitude = event.magnitude,
            old_calories = event.old_calories,
            new_calories = event.new_calories,
            "Adaptation event recorded"
        );
        Ok(())
    }
}

fn failed_entry(user_id: Uuid, error: &AppError) -> WeeklyBatchEntry {
    warn!(user_id = %user_id, error = %error, "Weekly adaptation check skipped");
    WeeklyBatchEntry {
        user_id,
        assessment: None,
        error: Some(error.to_string()),
    }
}
