// ABOUTME: Adaptation commands for nutriadapt-cli
// ABOUTME: Weekly checks, idempotent apply, event listing, and persona explanations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use chrono::Utc;
use nutriadapt::database::Database;
use nutriadapt::errors::{AppError, AppResult};
use nutriadapt::formatters::explainer_for;
use nutriadapt::services::AdaptationService;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::output::print_json;

/// Run the weekly check for one user, optionally applying a detected event
pub async fn check(service: &AdaptationService, user_id: Uuid, apply: bool) -> AppResult<()> {
    let assessment = service.run_weekly_check(user_id, Utc::now()).await?;
    let applied = match (&assessment.event, apply) {
        (Some(event), true) => Some(service.apply_event(event.id).await?),
        _ => None,
    };
    print_json(&json!({
        "assessment": assessment,
        "applied": applied,
    }))
}

/// Run the weekly check for every profile
pub async fn check_all(service: &AdaptationService) -> AppResult<()> {
    let report = service.run_weekly_batch(Utc::now()).await?;
    print_json(&report)
}

/// Apply a recorded event
pub async fn apply(service: &AdaptationService, event_id: Uuid) -> AppResult<()> {
    let outcome = service.apply_event(event_id).await?;
    print_json(&json!({
        "event_id": event_id,
        "outcome": outcome,
    }))
}

/// List a user's events, newest first
pub async fn events(database: &Database, user_id: Uuid) -> AppResult<()> {
    let events = database.list_adaptation_events(user_id).await?;
    print_json(&events)
}

/// Explain an event in the chosen persona's voice
pub async fn explain(database: &Database, event_id: Uuid, persona: &str) -> AppResult<()> {
    let event = database
        .get_adaptation_event(event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Adaptation event {event_id}")))?;
    print_json(&json!({
        "event_id": event_id,
        "persona": persona,
        "explanation": explainer_for(persona).explain(&event),
    }))
}
