// ABOUTME: Main library entry point for the somnia sleep tracking core
// ABOUTME: Exposes session recording, quality scoring, and insights aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Somnia
//!
//! A sleep-session simulation, scoring, and insights engine. Somnia owns the
//! lifecycle of one active sleep session: it samples simulated sleep phases,
//! ambient noise, and detected sounds on independent timers, scores the
//! finished session, and stores it in an in-memory insights collection that
//! supports weekly and per-day queries plus trend aggregation.
//!
//! ## Architecture
//!
//! - **Models**: schedule, phase, sound, noise, and session records
//! - **Recorder**: the `idle -> recording -> idle` state machine and its
//!   three periodic samplers
//! - **Scoring**: pure duration-bucket quality scoring with injected
//!   randomness
//! - **Insights**: capped newest-first session store and read-only
//!   aggregation functions
//! - **Clock**: injectable time source so tests run on deterministic time
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use somnia::clock::SystemClock;
//! use somnia::config::RecorderConfig;
//! use somnia::errors::AppResult;
//! use somnia::insights::InsightsStore;
//! use somnia::recorder::SleepRecorder;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = Arc::new(InsightsStore::new());
//!     let recorder = SleepRecorder::new(
//!         Arc::new(SystemClock),
//!         RecorderConfig::default(),
//!         Arc::clone(&store),
//!     );
//!
//!     recorder.start()?;
//!     tokio::time::sleep(std::time::Duration::from_secs(8 * 3600)).await;
//!     let session = recorder.stop()?;
//!
//!     if let Some(session) = session {
//!         println!("quality score: {}", session.quality.score);
//!     }
//!     Ok(())
//! }
//! ```

/// Injectable time source abstraction
pub mod clock;

/// Recorder configuration with environment overrides
pub mod config;

/// Unified error handling
pub mod errors;

/// In-memory session store and aggregation functions
pub mod insights;

/// Structured logging setup
pub mod logging;

/// Domain data models
pub mod models;

/// Sleep session recorder state machine and samplers
pub mod recorder;

/// Pure sleep quality scoring
pub mod scoring;
