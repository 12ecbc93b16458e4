// ABOUTME: Injectable time source abstraction for the recorder
// ABOUTME: Provides wall-clock and tokio-driven deterministic clocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Injectable clock sources
//!
//! The recorder never calls `Utc::now()` directly; it reads time from a
//! [`Clock`] so tests can run whole simulated nights deterministically.

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current timestamp
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that maps tokio's monotonic time onto a fixed epoch
///
/// Under a paused tokio runtime (`start_paused = true`), `tokio::time`
/// advances virtually while `Utc::now()` stands still. This clock anchors a
/// chosen epoch to the tokio instant observed at construction, so sampler
/// timestamps track the virtual timeline exactly.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    epoch: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl OffsetClock {
    /// Anchor `epoch` to the current tokio instant
    #[must_use]
    pub fn starting_at(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.started.elapsed();
        self.epoch + TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::MAX)
    }
}
