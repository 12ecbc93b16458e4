// ABOUTME: Recorder configuration with defaults and environment overrides
// ABOUTME: Tunes sampler cadences, simulation ranges, and the sleep goal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recorder Configuration
//!
//! Every cadence and simulation range the recorder uses lives here, with
//! production defaults matching the reference behavior and optional
//! environment overrides (prefix `SOMNIA_`). Overrides are validated before
//! use so a bad value fails at startup rather than mid-session.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Configuration for the sleep session recorder and its samplers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// How often the phase-detection sampler ticks
    pub phase_tick_interval: Duration,
    /// Length of one simulated sleep phase bucket in seconds
    pub phase_bucket_seconds: f64,
    /// Random duration range for the synthetic initial awake phase, seconds
    pub awake_prefix_seconds: (f64, f64),
    /// How often the ambient noise sampler ticks
    pub noise_tick_interval: Duration,
    /// Uniform dB range for simulated ambient noise readings
    pub noise_level_db: (f64, f64),
    /// How often the sound-detection sampler ticks
    pub sound_tick_interval: Duration,
    /// Probability that a sound tick detects an event
    pub sound_probability: f64,
    /// Random duration range for detected sound events, seconds
    pub sound_duration_seconds: (f64, f64),
    /// Random intensity range for detected sound events
    pub sound_intensity: (f64, f64),
    /// Number of amplitude samples in a synthetic waveform
    pub waveform_samples: usize,
    /// Sleep goal recorded on finalized sessions, seconds
    pub goal_duration_seconds: f64,
    /// Capacity of the recorder event broadcast channel
    pub event_channel_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            phase_tick_interval: Duration::from_secs(30),
            phase_bucket_seconds: 30.0 * 60.0,
            awake_prefix_seconds: (5.0 * 60.0, 15.0 * 60.0),
            noise_tick_interval: Duration::from_secs(10),
            noise_level_db: (20.0, 45.0),
            sound_tick_interval: Duration::from_secs(60),
            sound_probability: 0.3,
            sound_duration_seconds: (5.0, 30.0),
            sound_intensity: (0.3, 1.0),
            waveform_samples: 100,
            goal_duration_seconds: 8.0 * 3600.0,
            event_channel_capacity: 16,
        }
    }
}

impl RecorderConfig {
    /// Build a configuration from defaults plus `SOMNIA_*` overrides
    ///
    /// Recognized variables: `SOMNIA_PHASE_TICK_SECS`,
    /// `SOMNIA_PHASE_BUCKET_SECS`, `SOMNIA_NOISE_TICK_SECS`,
    /// `SOMNIA_SOUND_TICK_SECS`, `SOMNIA_SOUND_PROBABILITY`,
    /// `SOMNIA_GOAL_HOURS`.
    ///
    /// # Errors
    /// Returns an error if a variable is present but unparseable, or if the
    /// resulting configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_u64("SOMNIA_PHASE_TICK_SECS")? {
            config.phase_tick_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_f64("SOMNIA_PHASE_BUCKET_SECS")? {
            config.phase_bucket_seconds = secs;
        }
        if let Some(secs) = env_u64("SOMNIA_NOISE_TICK_SECS")? {
            config.noise_tick_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("SOMNIA_SOUND_TICK_SECS")? {
            config.sound_tick_interval = Duration::from_secs(secs);
        }
        if let Some(probability) = env_f64("SOMNIA_SOUND_PROBABILITY")? {
            config.sound_probability = probability;
        }
        if let Some(hours) = env_f64("SOMNIA_GOAL_HOURS")? {
            config.goal_duration_seconds = hours * 3600.0;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate that all tunables are in usable ranges
    ///
    /// # Errors
    /// Returns an error describing the first invalid field
    pub fn validate(&self) -> AppResult<()> {
        if self.phase_tick_interval.is_zero()
            || self.noise_tick_interval.is_zero()
            || self.sound_tick_interval.is_zero()
        {
            return Err(AppError::config("sampler tick intervals must be non-zero"));
        }
        if self.phase_bucket_seconds <= 0.0 {
            return Err(AppError::config("phase bucket length must be positive"));
        }
        if !(0.0..=1.0).contains(&self.sound_probability) {
            return Err(AppError::config(format!(
                "sound probability {} is outside [0, 1]",
                self.sound_probability
            )));
        }
        for (name, (lo, hi)) in [
            ("awake prefix", self.awake_prefix_seconds),
            ("noise level", self.noise_level_db),
            ("sound duration", self.sound_duration_seconds),
            ("sound intensity", self.sound_intensity),
        ] {
            if lo < 0.0 || hi <= lo {
                return Err(AppError::config(format!(
                    "{name} range ({lo}, {hi}) must be non-negative and increasing"
                )));
            }
        }
        if self.waveform_samples == 0 {
            return Err(AppError::config("waveform sample count must be non-zero"));
        }
        if self.goal_duration_seconds <= 0.0 {
            return Err(AppError::config("goal duration must be positive"));
        }
        if self.event_channel_capacity == 0 {
            return Err(AppError::config("event channel capacity must be non-zero"));
        }
        Ok(())
    }
}

fn env_u64(key: &str) -> AppResult<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| AppError::config(format!("invalid {key}='{raw}': {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AppError::config(format!("cannot read {key}: {e}"))),
    }
}

fn env_f64(key: &str) -> AppResult<Option<f64>> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| AppError::config(format!("invalid {key}='{raw}': {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AppError::config(format!("cannot read {key}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Process environment is shared across the test harness threads.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_are_valid() {
        assert!(RecorderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_cadences_match_reference() {
        let config = RecorderConfig::default();
        assert_eq!(config.phase_tick_interval, Duration::from_secs(30));
        assert_eq!(config.noise_tick_interval, Duration::from_secs(10));
        assert_eq!(config.sound_tick_interval, Duration::from_secs(60));
        assert!((config.phase_bucket_seconds - 1800.0).abs() < f64::EPSILON);
        assert!((config.sound_probability - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let config = RecorderConfig {
            sound_probability: 1.5,
            ..RecorderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = RecorderConfig {
            noise_level_db: (45.0, 20.0),
            ..RecorderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_applied() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("SOMNIA_PHASE_TICK_SECS", "5");
        env::set_var("SOMNIA_GOAL_HOURS", "7.5");
        let config = RecorderConfig::from_env().unwrap();
        env::remove_var("SOMNIA_PHASE_TICK_SECS");
        env::remove_var("SOMNIA_GOAL_HOURS");

        assert_eq!(config.phase_tick_interval, Duration::from_secs(5));
        assert!((config.goal_duration_seconds - 27_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparseable_env_value_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("SOMNIA_SOUND_PROBABILITY", "often");
        let result = RecorderConfig::from_env();
        env::remove_var("SOMNIA_SOUND_PROBABILITY");
        assert!(result.is_err());
    }
}
