// ABOUTME: Command implementations for nutriadapt-cli
// ABOUTME: Profile, sample import, adaptation check/apply, and nutrient reconciliation commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

pub mod adaptation;
pub mod profile;
pub mod reconcile;
pub mod samples;
