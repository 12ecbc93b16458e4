// ABOUTME: Domain data models for sleep tracking
// ABOUTME: Re-exports schedule and session record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bedtime/wake schedule model
pub mod schedule;

/// Session, phase, sound, noise, and quality records
pub mod session;

pub use schedule::SleepSchedule;
pub use session::{
    NoiseReading, SleepPhase, SleepPhaseType, SleepQualityRating, SleepQualityScore, SleepSession,
    SoundEvent, SoundEventType,
};
