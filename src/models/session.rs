// ABOUTME: Sleep session records and their component measurements
// ABOUTME: Phases, sound events, noise readings, quality scores, and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sleep session data model
//!
//! A [`SleepSession`] is the immutable record the recorder assembles at
//! end-of-session. Its component buffers (phases, sounds, noise readings)
//! are append-only while recording and frozen afterwards; derived quantities
//! (efficiency, average noise, goal progress) are computed on read.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of sleep phases
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SleepPhaseType {
    /// Awake - user is conscious and alert
    Awake,
    /// Light sleep - easy to wake from, body relaxing
    Light,
    /// Deep sleep - restorative, hard to wake from
    Deep,
    /// REM (Rapid Eye Movement) sleep - dreaming, memory consolidation
    Rem,
}

impl SleepPhaseType {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Awake => "Awake",
            Self::Light => "Light",
            Self::Deep => "Deep",
            Self::Rem => "REM",
        }
    }
}

/// One labeled sub-interval of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepPhase {
    /// Phase type
    pub phase_type: SleepPhaseType,
    /// When this phase started
    pub start_time: DateTime<Utc>,
    /// Phase length in seconds
    pub duration_seconds: f64,
    /// Share of the session spent in this phase, 0-100
    ///
    /// Zero while recording; back-filled once at session finalization.
    pub percentage: f64,
}

impl SleepPhase {
    /// Create a phase with an unset percentage
    #[must_use]
    pub const fn new(
        phase_type: SleepPhaseType,
        start_time: DateTime<Utc>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            phase_type,
            start_time,
            duration_seconds,
            percentage: 0.0,
        }
    }

    /// When this phase ended
    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + seconds_to_delta(self.duration_seconds)
    }
}

/// Types of detected sounds
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoundEventType {
    /// Snoring detected
    Snoring,
    /// Talking detected
    Talking,
    /// Movement detected
    Movement,
    /// Unclassified sound
    Other,
}

impl SoundEventType {
    /// All sound event types, for uniform random selection
    pub const ALL: [Self; 4] = [Self::Snoring, Self::Talking, Self::Movement, Self::Other];

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Snoring => "Snoring",
            Self::Talking => "Talking",
            Self::Movement => "Movement",
            Self::Other => "Other",
        }
    }
}

/// One detected sound during a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundEvent {
    /// Sound classification
    pub event_type: SoundEventType,
    /// When the sound was detected
    pub timestamp: DateTime<Utc>,
    /// Sound length in seconds
    pub duration_seconds: f64,
    /// Relative loudness in `[0.3, 1.0)`
    pub intensity: f64,
    /// Synthetic amplitude samples for waveform display
    pub waveform: Vec<f32>,
}

/// One ambient noise sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoiseReading {
    /// When the level was sampled
    pub timestamp: DateTime<Utc>,
    /// Sound pressure level in dB, roughly 20-45 for a quiet bedroom
    pub level_db: f64,
}

/// Categorical sleep quality rating
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SleepQualityRating {
    /// 9 or more hours
    Excellent,
    /// 7 to 9 hours
    Good,
    /// 6 to 7 hours
    Fair,
    /// 4 to 6 hours
    Poor,
    /// Under 4 hours
    TooShort,
}

impl SleepQualityRating {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::TooShort => "Too short",
        }
    }
}

/// Numeric and categorical sleep quality summary
///
/// Computed exactly once at session finalization, immutable thereafter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SleepQualityScore {
    /// Overall score, 0-100
    pub score: u8,
    /// Categorical rating derived from session duration
    pub rating: SleepQualityRating,
}

/// One finalized sleep-tracking interval
///
/// Created once by the recorder at end-of-session and owned by the insights
/// store afterwards; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepSession {
    /// Unique identifier
    pub id: Uuid,
    /// Calendar anchor for day/week queries (the session's start)
    pub date: DateTime<Utc>,
    /// When recording started
    pub start_time: DateTime<Utc>,
    /// When recording stopped
    pub end_time: DateTime<Utc>,
    /// Recorded sleep phases, in chronological order
    pub phases: Vec<SleepPhase>,
    /// Detected sounds, in chronological order
    pub sounds: Vec<SoundEvent>,
    /// Ambient noise samples, in chronological order
    pub noise_readings: Vec<NoiseReading>,
    /// Quality summary computed at finalization
    pub quality: SleepQualityScore,
    /// Sleep goal in effect when the session was recorded, seconds
    pub goal_duration_seconds: f64,
}

impl SleepSession {
    /// Total recorded time from start to stop
    #[must_use]
    pub fn total_time(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    /// Total recorded time in seconds
    #[must_use]
    pub fn total_seconds(&self) -> f64 {
        delta_to_seconds(self.total_time())
    }

    /// Time in bed; identical to the total recorded time
    #[must_use]
    pub fn time_in_bed_seconds(&self) -> f64 {
        self.total_seconds()
    }

    /// Seconds spent in non-awake phases
    #[must_use]
    pub fn actual_sleep_seconds(&self) -> f64 {
        self.phases
            .iter()
            .filter(|p| p.phase_type != SleepPhaseType::Awake)
            .map(|p| p.duration_seconds)
            .sum()
    }

    /// Sleep efficiency: actual sleep over time in bed, or 0 for an
    /// instantaneous session
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        let total = self.total_seconds();
        if total > 0.0 {
            self.actual_sleep_seconds() / total
        } else {
            0.0
        }
    }

    /// Mean ambient noise level in dB, or 0 when no readings exist
    #[must_use]
    pub fn average_noise_level(&self) -> f64 {
        if self.noise_readings.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)] // Safe: at most a night's worth of samples
        let count = self.noise_readings.len() as f64;
        self.noise_readings.iter().map(|r| r.level_db).sum::<f64>() / count
    }

    /// Progress toward the sleep goal, clamped to `[0, 1]`
    #[must_use]
    pub fn goal_progress(&self) -> f64 {
        if self.goal_duration_seconds > 0.0 {
            (self.actual_sleep_seconds() / self.goal_duration_seconds).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Combined percentage for one phase type, or None when the session has
    /// no phase of that type
    #[must_use]
    pub fn phase_percentage(&self, phase_type: SleepPhaseType) -> Option<f64> {
        let matching: Vec<&SleepPhase> = self
            .phases
            .iter()
            .filter(|p| p.phase_type == phase_type)
            .collect();
        if matching.is_empty() {
            return None;
        }
        Some(matching.iter().map(|p| p.percentage).sum())
    }
}

/// Convert fractional seconds to a `TimeDelta` with millisecond precision
#[must_use]
pub fn seconds_to_delta(seconds: f64) -> TimeDelta {
    #[allow(clippy::cast_possible_truncation)] // Safe: session durations fit in i64 milliseconds
    TimeDelta::milliseconds((seconds * 1000.0) as i64)
}

/// Convert a `TimeDelta` to fractional seconds
#[must_use]
pub fn delta_to_seconds(delta: TimeDelta) -> f64 {
    #[allow(clippy::cast_precision_loss)] // Safe: session durations are far below 2^52 ms
    {
        delta.num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 7, 23, 0, 0).unwrap()
    }

    fn session_with_phases(phases: Vec<SleepPhase>, total_hours: i64) -> SleepSession {
        let start = base_time();
        SleepSession {
            id: Uuid::new_v4(),
            date: start,
            start_time: start,
            end_time: start + TimeDelta::hours(total_hours),
            phases,
            sounds: Vec::new(),
            noise_readings: Vec::new(),
            quality: SleepQualityScore {
                score: 80,
                rating: SleepQualityRating::Good,
            },
            goal_duration_seconds: 8.0 * 3600.0,
        }
    }

    #[test]
    fn test_actual_sleep_excludes_awake() {
        let start = base_time();
        let session = session_with_phases(
            vec![
                SleepPhase::new(SleepPhaseType::Awake, start, 600.0),
                SleepPhase::new(SleepPhaseType::Light, start, 1800.0),
                SleepPhase::new(SleepPhaseType::Deep, start, 1800.0),
            ],
            1,
        );
        assert!((session.actual_sleep_seconds() - 3600.0).abs() < f64::EPSILON);
        assert!((session.efficiency() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_noise_empty_is_zero() {
        let session = session_with_phases(Vec::new(), 8);
        assert!(session.average_noise_level().abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_noise_is_mean_of_levels() {
        let mut session = session_with_phases(Vec::new(), 8);
        session.noise_readings = vec![
            NoiseReading {
                timestamp: base_time(),
                level_db: 20.0,
            },
            NoiseReading {
                timestamp: base_time(),
                level_db: 40.0,
            },
        ];
        assert!((session.average_noise_level() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_progress_clamped() {
        let start = base_time();
        let session = session_with_phases(
            vec![SleepPhase::new(
                SleepPhaseType::Light,
                start,
                10.0 * 3600.0,
            )],
            10,
        );
        assert!((session.goal_progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_phase_percentage_absent_type() {
        let start = base_time();
        let mut phase = SleepPhase::new(SleepPhaseType::Light, start, 1800.0);
        phase.percentage = 100.0;
        let session = session_with_phases(vec![phase], 8);
        assert!(session.phase_percentage(SleepPhaseType::Rem).is_none());
        assert!((session.phase_percentage(SleepPhaseType::Light).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_end_time() {
        let start = base_time();
        let phase = SleepPhase::new(SleepPhaseType::Deep, start, 1800.0);
        assert_eq!(phase.end_time(), start + TimeDelta::minutes(30));
    }

    #[test]
    fn test_session_serializes_round_trip() {
        let session = session_with_phases(Vec::new(), 8);
        let json = serde_json::to_string(&session).unwrap();
        let back: SleepSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, session.id);
        assert_eq!(back.quality.rating, SleepQualityRating::Good);
    }
}
