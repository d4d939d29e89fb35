// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Keeps crate::errors paths stable for the service and database layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

//! # Unified Error Handling System
//!
//! See [`nutriadapt_core::errors`] for error codes and constructors.

pub use nutriadapt_core::errors::{AppError, AppResult, ErrorCode, ErrorContext};
