// ABOUTME: Insights module for historical sleep session storage and analysis
// ABOUTME: Re-exports the capped session store, aggregation, and consistency metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Read-only statistics over stored sessions
pub mod aggregation;

/// Variance-based sleep regularity metrics
pub mod consistency;

/// Capped newest-first session store
pub mod store;

pub use aggregation::WeeklySummary;
pub use store::{InsightsStore, MAX_STORED_SESSIONS};
