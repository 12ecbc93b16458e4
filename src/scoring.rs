// ABOUTME: Pure sleep quality scoring from session duration and detected sounds
// ABOUTME: Duration-hour buckets set the base score; sound disruptions subtract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sleep quality scoring
//!
//! Maps a finished session's duration and detected sounds to a bounded
//! 0-100 score plus a categorical rating. The base score is a random draw
//! inside a duration bucket; the random source is injected so callers
//! needing reproducibility pass a seeded generator.

use crate::models::{SleepQualityRating, SleepQualityScore, SoundEvent};
use chrono::TimeDelta;
use rand::Rng;

/// Maximum total penalty from sound disruptions
const MAX_SOUND_PENALTY: i32 = 20;

/// Penalty per detected sound
const PENALTY_PER_SOUND: i32 = 5;

/// Score a finished session
///
/// Duration buckets (hours): under 4 is too short, 4-6 poor, 6-7 fair,
/// 7-9 good, 9 and up excellent. Each detected sound subtracts 5 points up
/// to a cap of 20; the final score never drops below 0. The rating depends
/// on duration only, so sound disruptions lower the score without changing
/// the category.
pub fn score_session<R: Rng + ?Sized>(
    total: TimeDelta,
    sounds: &[SoundEvent],
    rng: &mut R,
) -> SleepQualityScore {
    #[allow(clippy::cast_precision_loss)] // Safe: session durations are far below 2^52 seconds
    let hours = total.num_seconds() as f64 / 3600.0;

    let (base, rating): (i32, SleepQualityRating) = if hours < 4.0 {
        (rng.gen_range(10..=30), SleepQualityRating::TooShort)
    } else if hours < 6.0 {
        (rng.gen_range(30..50), SleepQualityRating::Poor)
    } else if hours < 7.0 {
        (rng.gen_range(50..70), SleepQualityRating::Fair)
    } else if hours < 9.0 {
        (rng.gen_range(70..90), SleepQualityRating::Good)
    } else {
        (rng.gen_range(85..=95), SleepQualityRating::Excellent)
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    // Safe: penalty is capped at 20
    let penalty = (sounds.len() as i32 * PENALTY_PER_SOUND).min(MAX_SOUND_PENALTY);

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    // Safe: clamped to [0, 95]
    let score = (base - penalty).max(0) as u8;

    SleepQualityScore { score, rating }
}
