// ABOUTME: Read-only aggregation functions over stored sleep sessions
// ABOUTME: Averages, best score, phase-percentage means, and trend series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session aggregation
//!
//! Pure functions over a newest-first session slice (the store's natural
//! order). Empty input yields defined neutral zeros rather than errors;
//! callers distinguish "no data" by checking the input collection, not the
//! result.
//!
//! Trend series are returned oldest-to-newest, the order charts consume.

use crate::insights::consistency;
use crate::models::{SleepPhaseType, SleepSession};
use serde::{Deserialize, Serialize};

/// Mean actual sleep time in seconds, or 0 for empty input
#[must_use]
pub fn average_sleep_duration(sessions: &[SleepSession]) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // Safe: the store caps at 30 sessions
    let count = sessions.len() as f64;
    sessions.iter().map(SleepSession::actual_sleep_seconds).sum::<f64>() / count
}

/// Highest quality score, or 0 for empty input
#[must_use]
pub fn best_score(sessions: &[SleepSession]) -> u8 {
    sessions.iter().map(|s| s.quality.score).max().unwrap_or(0)
}

/// Mean percentage for one phase type over the sessions containing it
///
/// Sessions without that phase type are excluded from the mean; returns 0
/// when none contain it.
#[must_use]
pub fn average_phase_percentage(sessions: &[SleepSession], phase_type: SleepPhaseType) -> f64 {
    let percentages: Vec<f64> = sessions
        .iter()
        .filter_map(|s| s.phase_percentage(phase_type))
        .collect();
    if percentages.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // Safe: the store caps at 30 sessions
    let count = percentages.len() as f64;
    percentages.iter().sum::<f64>() / count
}

/// Quality scores of the most recent `window` sessions, oldest-to-newest
#[must_use]
pub fn quality_trend(sessions: &[SleepSession], window: usize) -> Vec<u8> {
    let mut series: Vec<u8> = sessions
        .iter()
        .take(window)
        .map(|s| s.quality.score)
        .collect();
    series.reverse();
    series
}

/// Actual sleep time in hours for the most recent `window` sessions,
/// oldest-to-newest
#[must_use]
pub fn duration_trend(sessions: &[SleepSession], window: usize) -> Vec<f64> {
    let mut series: Vec<f64> = sessions
        .iter()
        .take(window)
        .map(|s| s.actual_sleep_seconds() / 3600.0)
        .collect();
    series.reverse();
    series
}

/// Aggregated weekly insight summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Sessions contributing to the summary
    pub session_count: usize,
    /// Mean actual sleep time in hours
    pub average_sleep_hours: f64,
    /// Highest quality score
    pub best_score: u8,
    /// Mean awake percentage over sessions containing awake phases
    pub awake_percent: f64,
    /// Mean light-sleep percentage
    pub light_percent: f64,
    /// Mean deep-sleep percentage
    pub deep_percent: f64,
    /// Mean REM percentage
    pub rem_percent: f64,
    /// Quality scores, oldest-to-newest
    pub quality_trend: Vec<u8>,
    /// Sleep hours, oldest-to-newest
    pub duration_trend: Vec<f64>,
    /// Bedtime regularity, 0-100
    pub bedtime_consistency: f64,
    /// Wake-time regularity, 0-100
    pub wake_consistency: f64,
    /// Duration regularity, 0-100
    pub duration_consistency: f64,
}

impl WeeklySummary {
    /// Default trend window: one week of nightly sessions
    pub const TREND_WINDOW: usize = 7;

    /// Summarize a newest-first session slice
    #[must_use]
    pub fn from_sessions(sessions: &[SleepSession]) -> Self {
        Self {
            session_count: sessions.len(),
            average_sleep_hours: average_sleep_duration(sessions) / 3600.0,
            best_score: best_score(sessions),
            awake_percent: average_phase_percentage(sessions, SleepPhaseType::Awake),
            light_percent: average_phase_percentage(sessions, SleepPhaseType::Light),
            deep_percent: average_phase_percentage(sessions, SleepPhaseType::Deep),
            rem_percent: average_phase_percentage(sessions, SleepPhaseType::Rem),
            quality_trend: quality_trend(sessions, Self::TREND_WINDOW),
            duration_trend: duration_trend(sessions, Self::TREND_WINDOW),
            bedtime_consistency: consistency::bedtime_consistency(sessions),
            wake_consistency: consistency::wake_consistency(sessions),
            duration_consistency: consistency::duration_consistency(sessions),
        }
    }
}
