// ABOUTME: Calorie target profile holding the user's live daily calorie target
// ABOUTME: Applies adaptation events exactly once, keyed by event id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metabolic::AdaptationEvent;
use crate::errors::{AppError, AppResult};

/// Result of applying an adaptation event to a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The target changed
    Applied {
        /// Target before the event
        previous_calories: i32,
        /// Target after the event
        daily_calories: i32,
    },
    /// The event was applied earlier; nothing changed
    AlreadyApplied {
        /// Current target
        daily_calories: i32,
    },
}

impl ApplyOutcome {
    /// Daily calorie target after the apply step
    #[must_use]
    pub const fn daily_calories(&self) -> i32 {
        match self {
            Self::Applied { daily_calories, .. } | Self::AlreadyApplied { daily_calories } => {
                *daily_calories
            }
        }
    }
}

/// A user's live calorie target plus the ids of events already applied to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieTargetProfile {
    /// Owner of the profile
    pub user_id: Uuid,
    /// Current daily calorie target (kcal)
    pub daily_calories: i32,
    /// Idempotency keys of applied events
    #[serde(default)]
    pub applied_event_ids: BTreeSet<Uuid>,
}

impl CalorieTargetProfile {
    /// Create a profile with no applied events
    #[must_use]
    pub const fn new(user_id: Uuid, daily_calories: i32) -> Self {
        Self {
            user_id,
            daily_calories,
            applied_event_ids: BTreeSet::new(),
        }
    }

    /// Set the target from the event's `new_calories`, once per event id
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the event belongs to another user
    pub fn apply_event(&mut self, event: &AdaptationEvent) -> AppResult<ApplyOutcome> {
        if event.user_id != self.user_id {
            return Err(AppError::invalid_input(format!(
                "adaptation event {} belongs to a different user",
                event.id
            ))
            .with_user_id(self.user_id)
            .with_resource_id(event.id.to_string()));
        }

        if !self.applied_event_ids.insert(event.id) {
            return Ok(ApplyOutcome::AlreadyApplied {
                daily_calories: self.daily_calories,
            });
        }

        let previous_calories = self.daily_calories;
        self.daily_calories = event.new_calories;
        Ok(ApplyOutcome::Applied {
            previous_calories,
            daily_calories: self.daily_calories,
        })
    }

    /// Whether the event id has already been applied
    #[must_use]
    pub fn has_applied(&self, event_id: Uuid) -> bool {
        self.applied_event_ids.contains(&event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metabolic::AdaptationType;
    use chrono::{NaiveDate, Utc};

    fn stall_event(user_id: Uuid) -> AdaptationEvent {
        AdaptationEvent {
            id: Uuid::new_v4(),
            user_id,
            detected_at: Utc::now(),
            week_start_date: NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            adaptation_type: AdaptationType::DeficitStall,
            magnitude: 0.25,
            old_calories: 1800,
            new_calories: 1350,
            old_expenditure_estimate: 2177.0,
            new_expenditure_estimate: 1975.0,
        }
    }

    #[test]
    fn test_apply_event_twice_changes_target_once() {
        let user_id = Uuid::new_v4();
        let mut profile = CalorieTargetProfile::new(user_id, 1800);
        let event = stall_event(user_id);

        let first = profile.apply_event(&event).unwrap();
        assert_eq!(
            first,
            ApplyOutcome::Applied {
                previous_calories: 1800,
                daily_calories: 1350
            }
        );

        profile.daily_calories = 1400;
        let second = profile.apply_event(&event).unwrap();
        assert_eq!(second, ApplyOutcome::AlreadyApplied { daily_calories: 1400 });
        assert_eq!(profile.daily_calories, 1400);
        assert!(profile.has_applied(event.id));
    }

    #[test]
    fn test_apply_event_rejects_foreign_user() {
        let mut profile = CalorieTargetProfile::new(Uuid::new_v4(), 2000);
        let event = stall_event(Uuid::new_v4());
        let err = profile.apply_event(&event).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
        assert_eq!(profile.daily_calories, 2000);
    }
}
