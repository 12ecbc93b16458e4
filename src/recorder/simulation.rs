// ABOUTME: Simulated phase, noise, and sound sample generation
// ABOUTME: Deterministic bucket sequencing plus per-type synthetic waveforms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sleep simulation primitives
//!
//! Pure building blocks shared by the live recorder and the sample-history
//! synthesizer. Phase sequencing is deterministic: one fixed-length phase
//! per elapsed bucket, cycling light, deep, rem, light by bucket index.
//! Noise and sound sampling draw from the injected random source.

use crate::config::RecorderConfig;
use crate::models::session::seconds_to_delta;
use crate::models::{
    NoiseReading, SleepPhase, SleepPhaseType, SleepSession, SoundEvent, SoundEventType,
};
use crate::scoring;
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Phase type for one elapsed-time bucket
///
/// Buckets cycle light, deep, rem, light, matching one simplified 2-hour
/// sleep cycle per four buckets.
#[must_use]
pub fn phase_type_for_bucket(bucket: u64) -> SleepPhaseType {
    match bucket % 4 {
        0 => SleepPhaseType::Light,
        1 => SleepPhaseType::Deep,
        2 => SleepPhaseType::Rem,
        _ => SleepPhaseType::Light,
    }
}

/// Synthetic initial awake phase with a random duration from the configured
/// range
pub fn awake_prefix<R: Rng + ?Sized>(
    start: DateTime<Utc>,
    config: &RecorderConfig,
    rng: &mut R,
) -> SleepPhase {
    let (lo, hi) = config.awake_prefix_seconds;
    SleepPhase::new(SleepPhaseType::Awake, start, rng.gen_range(lo..hi))
}

/// Fixed-length phase covering one elapsed-time bucket
#[must_use]
pub fn phase_for_bucket(
    session_start: DateTime<Utc>,
    bucket: u64,
    config: &RecorderConfig,
) -> SleepPhase {
    #[allow(clippy::cast_precision_loss)] // Safe: bucket counts stay tiny
    let offset = bucket as f64 * config.phase_bucket_seconds;
    SleepPhase::new(
        phase_type_for_bucket(bucket),
        session_start + seconds_to_delta(offset),
        config.phase_bucket_seconds,
    )
}

/// One ambient noise sample drawn uniformly from the configured dB range
pub fn sample_noise<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    config: &RecorderConfig,
    rng: &mut R,
) -> NoiseReading {
    let (lo, hi) = config.noise_level_db;
    NoiseReading {
        timestamp: now,
        level_db: rng.gen_range(lo..=hi),
    }
}

/// Sound detection attempt: with the configured probability, produce one
/// random sound event with a synthetic waveform
pub fn detect_sound<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    config: &RecorderConfig,
    rng: &mut R,
) -> Option<SoundEvent> {
    if !rng.gen_bool(config.sound_probability) {
        return None;
    }
    Some(sample_sound(now, config, rng))
}

/// Unconditionally produce one random sound event
pub fn sample_sound<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    config: &RecorderConfig,
    rng: &mut R,
) -> SoundEvent {
    let event_type = SoundEventType::ALL[rng.gen_range(0..SoundEventType::ALL.len())];
    let (dur_lo, dur_hi) = config.sound_duration_seconds;
    let (int_lo, int_hi) = config.sound_intensity;
    SoundEvent {
        event_type,
        timestamp: now,
        duration_seconds: rng.gen_range(dur_lo..dur_hi),
        intensity: rng.gen_range(int_lo..int_hi),
        waveform: generate_waveform(event_type, config.waveform_samples, rng),
    }
}

/// Synthetic waveform shaped per sound type
///
/// Snoring is a modulated sine, talking is symmetric noise, movement is
/// front-loaded noise decaying after the first fifth of the window, and
/// unclassified sounds are low-amplitude noise.
pub fn generate_waveform<R: Rng + ?Sized>(
    event_type: SoundEventType,
    samples: usize,
    rng: &mut R,
) -> Vec<f32> {
    (0..samples)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)] // Safe: sample indices stay tiny
            let phase = i as f64 * 0.1;
            match event_type {
                #[allow(clippy::cast_possible_truncation)] // Safe: amplitudes are in [-1, 1]
                SoundEventType::Snoring => phase.sin() as f32 * rng.gen_range(0.3f32..0.8),
                SoundEventType::Talking => rng.gen_range(-0.6f32..0.6),
                SoundEventType::Movement => {
                    let envelope = if i < samples / 5 { 1.0 } else { 0.2 };
                    rng.gen_range(-0.4f32..0.4) * envelope
                }
                SoundEventType::Other => rng.gen_range(-0.3f32..0.3),
            }
        })
        .collect()
}

/// Back-fill phase percentages so they sum to 100
///
/// The share is computed over the total recorded phase time. Dividing by
/// the wall session duration instead would let the awake prefix push the
/// sum past 100 whenever it overlaps the first bucket.
pub fn backfill_percentages(phases: &mut [SleepPhase]) {
    let total: f64 = phases.iter().map(|p| p.duration_seconds).sum();
    if total <= 0.0 {
        return;
    }
    for phase in phases {
        phase.percentage = (phase.duration_seconds / total) * 100.0;
    }
}

/// Synthesize one complete, finalized session covering `[start, end)`
///
/// Used to seed demonstration history: an awake prefix, bucket-cycled
/// phases, five-minute noise samples, a handful of random sounds in
/// chronological order, and a quality score from the same scorer the live
/// recorder uses.
pub fn synthesize_session<R: Rng + ?Sized>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &RecorderConfig,
    rng: &mut R,
) -> SleepSession {
    #[allow(clippy::cast_precision_loss)] // Safe: session durations are far below 2^52 seconds
    let total_seconds = (end - start).num_seconds().max(0) as f64;

    let mut phases = vec![awake_prefix(start, config, rng)];
    let mut bucket = 0u64;
    #[allow(clippy::cast_precision_loss)] // Safe: bucket counts stay tiny
    while (bucket as f64) * config.phase_bucket_seconds < total_seconds {
        phases.push(phase_for_bucket(start, bucket, config));
        bucket += 1;
    }
    backfill_percentages(&mut phases);

    let mut sounds: Vec<SoundEvent> = (0..rng.gen_range(2..=8))
        .map(|_| {
            let offset = rng.gen_range(0.0..total_seconds.max(1.0));
            sample_sound(start + seconds_to_delta(offset), config, rng)
        })
        .collect();
    sounds.sort_by_key(|s| s.timestamp);

    let noise_spacing = 300.0;
    let mut noise_readings = Vec::new();
    let mut offset = 0.0;
    while offset < total_seconds {
        noise_readings.push(sample_noise(start + seconds_to_delta(offset), config, rng));
        offset += noise_spacing;
    }

    let quality = scoring::score_session(end - start, &sounds, rng);

    SleepSession {
        id: Uuid::new_v4(),
        date: start,
        start_time: start,
        end_time: end,
        phases,
        sounds,
        noise_readings,
        quality,
        goal_duration_seconds: config.goal_duration_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 7, 23, 0, 0).unwrap()
    }

    #[test]
    fn test_bucket_cycle_is_light_deep_rem_light() {
        let expected = [
            SleepPhaseType::Light,
            SleepPhaseType::Deep,
            SleepPhaseType::Rem,
            SleepPhaseType::Light,
        ];
        for bucket in 0..16 {
            assert_eq!(
                phase_type_for_bucket(bucket),
                expected[(bucket % 4) as usize]
            );
        }
    }

    #[test]
    fn test_awake_prefix_duration_in_range() {
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let phase = awake_prefix(start_time(), &config, &mut rng);
            assert_eq!(phase.phase_type, SleepPhaseType::Awake);
            assert!(phase.duration_seconds >= 300.0 && phase.duration_seconds < 900.0);
        }
    }

    #[test]
    fn test_noise_levels_in_configured_range() {
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let reading = sample_noise(start_time(), &config, &mut rng);
            assert!(reading.level_db >= 20.0 && reading.level_db <= 45.0);
        }
    }

    #[test]
    fn test_waveform_length_and_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for event_type in SoundEventType::ALL {
            let waveform = generate_waveform(event_type, 100, &mut rng);
            assert_eq!(waveform.len(), 100);
            assert!(waveform.iter().all(|a| a.abs() <= 1.0));
        }
    }

    #[test]
    fn test_movement_waveform_decays_after_onset() {
        let mut rng = StdRng::seed_from_u64(6);
        let waveform = generate_waveform(SoundEventType::Movement, 100, &mut rng);
        assert!(waveform[20..].iter().all(|a| a.abs() <= 0.4 * 0.2 + 1e-6));
    }

    #[test]
    fn test_backfill_percentages_sum_to_hundred() {
        let start = start_time();
        let mut phases = vec![
            SleepPhase::new(SleepPhaseType::Awake, start, 600.0),
            SleepPhase::new(SleepPhaseType::Light, start, 1800.0),
            SleepPhase::new(SleepPhaseType::Deep, start, 1800.0),
            SleepPhase::new(SleepPhaseType::Rem, start, 1800.0),
        ];
        backfill_percentages(&mut phases);
        let sum: f64 = phases.iter().map(|p| p.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!(phases.iter().all(|p| p.percentage >= 0.0));
    }

    #[test]
    fn test_backfill_empty_phases_is_noop() {
        let mut phases: Vec<SleepPhase> = Vec::new();
        backfill_percentages(&mut phases);
        assert!(phases.is_empty());
    }

    #[test]
    fn test_synthesized_session_invariants() {
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let start = start_time();
        let end = start + TimeDelta::hours(8);
        let session = synthesize_session(start, end, &config, &mut rng);

        assert_eq!(session.phases[0].phase_type, SleepPhaseType::Awake);
        let sum: f64 = session.phases.iter().map(|p| p.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!(session.sounds.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(!session.noise_readings.is_empty());
        assert!(session.quality.score <= 100);
    }
}
