// ABOUTME: Variance-based sleep regularity metrics
// ABOUTME: Circular spread of bed/wake clock times and spread of durations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sleep consistency metrics
//!
//! Regularity percentages derived from actual variance, bounded to
//! `[0, 100]` and deterministic for identical inputs. Clock-time spread is
//! measured circularly so a pattern straddling midnight (23:50 one night,
//! 00:10 the next) reads as highly consistent rather than wildly variable.
//!
//! The mapping from spread to percentage is linear: a standard deviation of
//! zero scores 100 and [`SPREAD_FLOOR_MINUTES`] or more scores 0.

use crate::models::SleepSession;
use chrono::{DateTime, Timelike, Utc};
use std::f64::consts::TAU;

/// Standard deviation (minutes) at or beyond which consistency reads as 0
pub const SPREAD_FLOOR_MINUTES: f64 = 120.0;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Bedtime regularity over the given sessions, 0-100
#[must_use]
pub fn bedtime_consistency(sessions: &[SleepSession]) -> f64 {
    clock_time_consistency(sessions, |s| s.start_time)
}

/// Wake-time regularity over the given sessions, 0-100
#[must_use]
pub fn wake_consistency(sessions: &[SleepSession]) -> f64 {
    clock_time_consistency(sessions, |s| s.end_time)
}

/// Sleep-duration regularity over the given sessions, 0-100
#[must_use]
pub fn duration_consistency(sessions: &[SleepSession]) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    let minutes: Vec<f64> = sessions
        .iter()
        .map(|s| s.actual_sleep_seconds() / 60.0)
        .collect();
    spread_to_percentage(standard_deviation(&minutes))
}

fn clock_time_consistency(
    sessions: &[SleepSession],
    time_of: impl Fn(&SleepSession) -> DateTime<Utc>,
) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    let minutes: Vec<f64> = sessions
        .iter()
        .map(|s| minute_of_day(time_of(s)))
        .collect();
    spread_to_percentage(circular_standard_deviation_minutes(&minutes))
}

fn minute_of_day(t: DateTime<Utc>) -> f64 {
    f64::from(t.hour() * 60 + t.minute()) + f64::from(t.second()) / 60.0
}

/// Plain standard deviation (population form)
fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // Safe: the store caps at 30 sessions
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Circular standard deviation of minute-of-day values, in minutes
///
/// Maps each value onto the unit circle, takes the mean resultant length R,
/// and converts `sqrt(-2 ln R)` radians back to minutes. R near 1 means
/// tightly clustered times; R near 0 yields a spread beyond the floor.
fn circular_standard_deviation_minutes(minutes: &[f64]) -> f64 {
    if minutes.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)] // Safe: the store caps at 30 sessions
    let n = minutes.len() as f64;
    let (sin_sum, cos_sum) = minutes.iter().fold((0.0f64, 0.0f64), |(s, c), m| {
        let angle = m / MINUTES_PER_DAY * TAU;
        (s + angle.sin(), c + angle.cos())
    });
    let resultant = (sin_sum / n).hypot(cos_sum / n);
    if resultant <= f64::EPSILON {
        return MINUTES_PER_DAY; // uniformly scattered, far past the floor
    }
    let spread_radians = (-2.0 * resultant.ln()).max(0.0).sqrt();
    spread_radians / TAU * MINUTES_PER_DAY
}

fn spread_to_percentage(spread_minutes: f64) -> f64 {
    (100.0 * (1.0 - spread_minutes / SPREAD_FLOOR_MINUTES)).clamp(0.0, 100.0)
}
