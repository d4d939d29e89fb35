// ABOUTME: Explanation formatters turning adaptation events into user-facing text
// ABOUTME: One explain(event) capability with a plain voice and selectable coach personas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! Adaptation Explanation Layer
//!
//! Presentation only: explainers read an [`AdaptationEvent`] and never influence the
//! numbers in it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nutriadapt::formatters::explainer_for;
//!
//! let text = explainer_for("supportive").explain(&event);
//! ```

use std::fmt;

use nutriadapt_core::models::{AdaptationEvent, AdaptationType};

/// Renders an adaptation event as text
pub trait AdaptationExplainer: Send + Sync {
    /// Human-readable explanation of the event
    fn explain(&self, event: &AdaptationEvent) -> String;
}

/// Voice used for explanations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persona {
    /// Neutral summary
    #[default]
    Plain,
    /// Encouraging coach
    Supportive,
    /// Numbers-first coach
    Analytical,
    /// Blunt coach
    DrillSergeant,
}

impl Persona {
    /// Parse a persona name (case-insensitive); unknown names select `Plain`
    #[must_use]
    pub fn from_str_param(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "supportive" => Self::Supportive,
            "analytical" => Self::Analytical,
            "drill_sergeant" => Self::DrillSergeant,
            _ => Self::Plain,
        }
    }

    /// Persona name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Supportive => "supportive",
            Self::Analytical => "analytical",
            Self::DrillSergeant => "drill_sergeant",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explainer for a persona name
#[must_use]
pub fn explainer_for(persona: &str) -> Box<dyn AdaptationExplainer> {
    match Persona::from_str_param(persona) {
        Persona::Plain => Box::new(PlainExplainer),
        Persona::Supportive => Box::new(SupportiveExplainer),
        Persona::Analytical => Box::new(AnalyticalExplainer),
        Persona::DrillSergeant => Box::new(DrillSergeantExplainer),
    }
}

fn percent(magnitude: f64) -> i64 {
    (magnitude * 100.0).round() as i64
}

fn direction(event: &AdaptationEvent) -> &'static str {
    match event.calorie_delta() {
        d if d > 0 => "raised",
        d if d < 0 => "lowered",
        _ => "kept",
    }
}

/// Neutral summary of what changed
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainExplainer;

impl AdaptationExplainer for PlainExplainer {
    fn explain(&self, event: &AdaptationEvent) -> String {
        let cause = match event.adaptation_type {
            AdaptationType::DeficitStall => "Weight loss slowed while intake stayed steady",
            AdaptationType::SurplusSlow => "Weight gain slowed while intake stayed steady",
            AdaptationType::Stable => "No material change in your trend",
        };
        format!(
            "{cause}. Daily target {} from {} to {} kcal ({}% adjustment) for the week of {}.",
            direction(event),
            event.old_calories,
            event.new_calories,
            percent(event.magnitude),
            event.week_start_date
        )
    }
}

/// Encouraging framing
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportiveExplainer;

impl AdaptationExplainer for SupportiveExplainer {
    fn explain(&self, event: &AdaptationEvent) -> String {
        match event.adaptation_type {
            AdaptationType::DeficitStall => format!(
                "You've been consistent, and your body has adjusted to it. That's normal. \
                 We're moving your target from {} to {} kcal to get progress going again.",
                event.old_calories, event.new_calories
            ),
            AdaptationType::SurplusSlow => format!(
                "Your consistency is paying off, and your body now needs a bit more fuel. \
                 Your target goes from {} to {} kcal.",
                event.old_calories, event.new_calories
            ),
            AdaptationType::Stable => format!(
                "Everything is on track. Your target stays at {} kcal.",
                event.new_calories
            ),
        }
    }
}

/// Numbers-first framing with the expenditure estimates
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticalExplainer;

impl AdaptationExplainer for AnalyticalExplainer {
    fn explain(&self, event: &AdaptationEvent) -> String {
        format!(
            "{}: estimated expenditure {:.0} -> {:.0} kcal/day ({:+.0}). \
             Magnitude {:.2} applied to {} kcal gives {} kcal ({:+}).",
            event.adaptation_type.as_str(),
            event.old_expenditure_estimate,
            event.new_expenditure_estimate,
            event.new_expenditure_estimate - event.old_expenditure_estimate,
            event.magnitude,
            event.old_calories,
            event.new_calories,
            event.calorie_delta()
        )
    }
}

/// Blunt framing
#[derive(Debug, Clone, Copy, Default)]
pub struct DrillSergeantExplainer;

impl AdaptationExplainer for DrillSergeantExplainer {
    fn explain(&self, event: &AdaptationEvent) -> String {
        match event.adaptation_type {
            AdaptationType::DeficitStall => format!(
                "Your body caught up. New target: {} kcal. Hit it every day.",
                event.new_calories
            ),
            AdaptationType::SurplusSlow => format!(
                "Growth stalled. Eat {} kcal a day, no excuses.",
                event.new_calories
            ),
            AdaptationType::Stable => format!(
                "No change. {} kcal. Keep going.",
                event.new_calories
            ),
        }
    }
}
