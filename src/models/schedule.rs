// ABOUTME: Bedtime/wake-time schedule model with derived planned duration
// ABOUTME: Duration wraps across midnight and is derived from time-of-day only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A user's intended bedtime/wake-time pair
///
/// The planned duration is derived from the time-of-day components only and
/// wraps across midnight, so a 23:00 bedtime with a 07:00 wake time is eight
/// hours regardless of the calendar dates carried by the timestamps. The
/// schedule is mutated only by explicit edits; the recorder never touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepSchedule {
    /// Intended bedtime
    pub bedtime: DateTime<Utc>,
    /// Intended wake time
    pub wake_time: DateTime<Utc>,
    /// Whether the schedule is active
    pub enabled: bool,
}

impl SleepSchedule {
    /// Create an enabled schedule
    #[must_use]
    pub const fn new(bedtime: DateTime<Utc>, wake_time: DateTime<Utc>) -> Self {
        Self {
            bedtime,
            wake_time,
            enabled: true,
        }
    }

    /// Planned sleep duration in minutes, in `[0, 1440)`
    ///
    /// Computed as `(wake_minutes - bed_minutes) mod 1440` over minute-of-day
    /// components. Zero only when bedtime and wake time coincide.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        let bed = minute_of_day(self.bedtime);
        let wake = minute_of_day(self.wake_time);
        (wake + MINUTES_PER_DAY - bed) % MINUTES_PER_DAY
    }

    /// Planned sleep duration
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.duration_minutes()))
    }

    /// Planned duration rendered as `"7h 30m"`
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        let minutes = self.duration_minutes();
        format!("{}h {}m", minutes / 60, minutes % 60)
    }

    /// Set a new bedtime, keeping the wake time fixed
    pub fn set_bedtime(&mut self, bedtime: DateTime<Utc>) {
        self.bedtime = bedtime;
    }

    /// Set a new wake time, keeping the bedtime fixed
    pub fn set_wake_time(&mut self, wake_time: DateTime<Utc>) {
        self.wake_time = wake_time;
    }
}

fn minute_of_day(t: DateTime<Utc>) -> u32 {
    t.hour() * 60 + t.minute()
}
