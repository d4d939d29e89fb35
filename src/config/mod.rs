// ABOUTME: Configuration management for runtime settings and engine thresholds
// ABOUTME: Re-exports environment loading and the engine configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

/// Environment-based runtime configuration
pub mod environment;

pub use environment::{DatabaseUrl, ReferenceApiConfig, ServerConfig, DEFAULT_REFERENCE_BASE_URL};
pub use nutriadapt_intelligence::config::{
    ConfigError, IntelligenceConfig, MetabolicConfig, ReconciliationConfig,
};
