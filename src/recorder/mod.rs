// ABOUTME: Sleep session recorder state machine with periodic samplers
// ABOUTME: Owns the idle/recording lifecycle and finalizes immutable sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sleep session recorder
//!
//! One recorder owns at most one active session. `start()` spawns three
//! independent interval samplers (phase detection, ambient noise, sound
//! detection); `stop()` halts them, back-fills phase percentages, scores
//! the session, appends it to the insights store, and broadcasts a
//! finalization event.
//!
//! ## Concurrency
//!
//! All sampler appends and both lifecycle transitions go through one
//! `RwLock`. A sampler tick re-checks the recording flag under the write
//! lock before appending, and `stop()` flips that flag and takes the
//! buffers out under the same lock before computing any derived field, so
//! no tick can ever mutate a session that is being (or has been)
//! finalized. Task aborts afterwards are only cleanup.

/// Simulated phase, noise, and sound sample generation
pub mod simulation;

use crate::clock::Clock;
use crate::config::RecorderConfig;
use crate::errors::{AppError, AppResult};
use crate::insights::InsightsStore;
use crate::models::{NoiseReading, SleepPhase, SleepSession, SoundEvent};
use crate::scoring;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Events published by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A session was finalized and appended to the insights store
    SessionFinalized {
        /// Identifier of the finalized session
        session_id: Uuid,
    },
}

/// Mutable recording state shared with the sampler tasks
struct RecorderState {
    recording: bool,
    started_at: Option<DateTime<Utc>>,
    phases: Vec<SleepPhase>,
    sounds: Vec<SoundEvent>,
    noise_readings: Vec<NoiseReading>,
    /// Next phase bucket to record; buckets already covered are skipped so
    /// tick cadence and phase granularity stay independent
    next_bucket: u64,
}

impl RecorderState {
    const fn new() -> Self {
        Self {
            recording: false,
            started_at: None,
            phases: Vec::new(),
            sounds: Vec::new(),
            noise_readings: Vec::new(),
            next_bucket: 0,
        }
    }
}

/// Sleep session recorder
///
/// Explicitly constructed and shared by handle (`Arc`) rather than being a
/// process-global singleton, so multiple independent recorders can coexist
/// in tests.
pub struct SleepRecorder {
    state: Arc<RwLock<RecorderState>>,
    clock: Arc<dyn Clock>,
    config: RecorderConfig,
    store: Arc<InsightsStore>,
    events: broadcast::Sender<RecorderEvent>,
    sampler_tasks: Mutex<Vec<JoinHandle<()>>>,
    /// Seed base for sampler and scorer randomness; None draws from entropy
    seed: Option<u64>,
    score_rng: Mutex<StdRng>,
}

impl SleepRecorder {
    /// Create a recorder with entropy-seeded randomness
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: RecorderConfig, store: Arc<InsightsStore>) -> Self {
        Self::build(clock, config, store, None)
    }

    /// Create a recorder whose random draws derive from `seed`
    #[must_use]
    pub fn with_seed(
        clock: Arc<dyn Clock>,
        config: RecorderConfig,
        store: Arc<InsightsStore>,
        seed: u64,
    ) -> Self {
        Self::build(clock, config, store, Some(seed))
    }

    fn build(
        clock: Arc<dyn Clock>,
        config: RecorderConfig,
        store: Arc<InsightsStore>,
        seed: Option<u64>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        let score_rng = Mutex::new(seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64));
        Self {
            state: Arc::new(RwLock::new(RecorderState::new())),
            clock,
            config,
            store,
            events,
            sampler_tasks: Mutex::new(Vec::new()),
            seed,
            score_rng,
        }
    }

    /// Whether a session is currently being recorded
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.state.read().map_or(false, |state| state.recording)
    }

    /// Subscribe to recorder events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }

    /// Most recent finalized session, if any
    ///
    /// # Errors
    /// Returns an error if the insights store lock is poisoned
    pub fn latest_session(&self) -> AppResult<Option<SleepSession>> {
        self.store.latest_session()
    }

    /// Begin recording a new session
    ///
    /// A no-op when a session is already being recorded. Must be called
    /// from within a tokio runtime; the three samplers are spawned as
    /// independent cancellable tasks.
    ///
    /// # Errors
    /// Returns an error if the recorder state lock is poisoned
    pub fn start(&self) -> AppResult<()> {
        let started_at = {
            let mut state = write_state(&self.state)?;
            if state.recording {
                debug!("start ignored: session already recording");
                return Ok(());
            }
            let now = self.clock.now();
            state.recording = true;
            state.started_at = Some(now);
            state.phases.clear();
            state.sounds.clear();
            state.noise_readings.clear();
            state.next_bucket = 0;
            now
        };

        let tasks = vec![
            self.spawn_phase_sampler(started_at),
            self.spawn_noise_sampler(),
            self.spawn_sound_sampler(),
        ];
        if let Ok(mut handles) = self.sampler_tasks.lock() {
            handles.extend(tasks);
        }

        info!(%started_at, "sleep tracking started");
        Ok(())
    }

    /// Stop recording and finalize the session
    ///
    /// A no-op returning `Ok(None)` when no session is active. Otherwise
    /// halts the samplers, back-fills phase percentages, scores the
    /// session, appends it to the insights store, broadcasts
    /// [`RecorderEvent::SessionFinalized`], and returns the session.
    ///
    /// # Errors
    /// Returns an error if a lock is poisoned
    pub fn stop(&self) -> AppResult<Option<SleepSession>> {
        let (started_at, mut phases, sounds, noise_readings) = {
            let mut state = write_state(&self.state)?;
            if !state.recording {
                debug!("stop ignored: no session recording");
                return Ok(None);
            }
            state.recording = false;
            let started_at = state
                .started_at
                .take()
                .ok_or_else(|| AppError::internal("recording session has no start time"))?;
            (
                started_at,
                std::mem::take(&mut state.phases),
                std::mem::take(&mut state.sounds),
                std::mem::take(&mut state.noise_readings),
            )
        };

        // Samplers observe the cleared flag and exit; aborting just hurries
        // the ones parked on their next tick.
        if let Ok(mut handles) = self.sampler_tasks.lock() {
            for handle in handles.drain(..) {
                handle.abort();
            }
        }

        let end_time = self.clock.now();
        simulation::backfill_percentages(&mut phases);

        let quality = {
            let mut rng = self
                .score_rng
                .lock()
                .map_err(|_| AppError::internal("scorer rng lock poisoned"))?;
            scoring::score_session(end_time - started_at, &sounds, &mut *rng)
        };

        let session = SleepSession {
            id: Uuid::new_v4(),
            date: started_at,
            start_time: started_at,
            end_time,
            phases,
            sounds,
            noise_readings,
            quality,
            goal_duration_seconds: self.config.goal_duration_seconds,
        };

        self.store.add_session(session.clone())?;
        let _ = self
            .events
            .send(RecorderEvent::SessionFinalized { session_id: session.id });

        info!(
            session_id = %session.id,
            score = session.quality.score,
            rating = session.quality.rating.label(),
            "sleep tracking ended, session finalized"
        );
        Ok(Some(session))
    }

    fn sampler_rng(&self, stream: u64) -> StdRng {
        self.seed.map_or_else(StdRng::from_entropy, |seed| {
            StdRng::seed_from_u64(seed.wrapping_add(stream))
        })
    }

    fn spawn_phase_sampler(&self, session_start: DateTime<Utc>) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let config = self.config.clone();
        let mut rng = self.sampler_rng(1);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.phase_tick_interval);
            ticker.tick().await; // the first tick completes immediately
            loop {
                ticker.tick().await;
                let now = clock.now();
                let Ok(mut guard) = state.write() else { break };
                if !guard.recording {
                    break;
                }
                record_phase_tick(&mut guard, session_start, now, &config, &mut rng);
            }
        })
    }

    fn spawn_noise_sampler(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let config = self.config.clone();
        let mut rng = self.sampler_rng(2);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.noise_tick_interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let now = clock.now();
                let Ok(mut guard) = state.write() else { break };
                if !guard.recording {
                    break;
                }
                let reading = simulation::sample_noise(now, &config, &mut rng);
                guard.noise_readings.push(reading);
            }
        })
    }

    fn spawn_sound_sampler(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let config = self.config.clone();
        let mut rng = self.sampler_rng(3);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.sound_tick_interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let now = clock.now();
                let Ok(mut guard) = state.write() else { break };
                if !guard.recording {
                    break;
                }
                if let Some(event) = simulation::detect_sound(now, &config, &mut rng) {
                    debug!(sound = event.event_type.label(), "sound event detected");
                    guard.sounds.push(event);
                }
            }
        })
    }
}

/// Record one phase-detection tick
///
/// The first effective tick prepends the synthetic awake prefix. One
/// fixed-length phase is appended per fully entered bucket; a tick landing
/// inside an already-recorded bucket appends nothing.
fn record_phase_tick<R: Rng + ?Sized>(
    state: &mut RecorderState,
    session_start: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &RecorderConfig,
    rng: &mut R,
) {
    if state.phases.is_empty() {
        let prefix = simulation::awake_prefix(session_start, config, rng);
        state.phases.push(prefix);
    }

    #[allow(clippy::cast_precision_loss)] // Safe: elapsed seconds fit well below 2^52
    let elapsed = (now - session_start).num_seconds().max(0) as f64;
    #[allow(clippy::cast_precision_loss)] // Safe: bucket counts stay tiny
    while (state.next_bucket as f64) * config.phase_bucket_seconds < elapsed {
        let phase = simulation::phase_for_bucket(session_start, state.next_bucket, config);
        state.phases.push(phase);
        state.next_bucket += 1;
    }
}

fn write_state<'a>(
    state: &'a Arc<RwLock<RecorderState>>,
) -> AppResult<std::sync::RwLockWriteGuard<'a, RecorderState>> {
    state
        .write()
        .map_err(|_| AppError::internal("recorder state lock poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn state_with_start() -> (RecorderState, DateTime<Utc>) {
        let mut state = RecorderState::new();
        let start = Utc.with_ymd_and_hms(2025, 7, 7, 23, 0, 0).unwrap();
        state.recording = true;
        state.started_at = Some(start);
        (state, start)
    }

    #[test]
    fn test_first_tick_prepends_awake_prefix() {
        let (mut state, start) = state_with_start();
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        record_phase_tick(&mut state, start, start + TimeDelta::seconds(30), &config, &mut rng);

        assert_eq!(state.phases[0].phase_type, crate::models::SleepPhaseType::Awake);
        assert_eq!(state.phases.len(), 2); // awake prefix + bucket 0
    }

    #[test]
    fn test_ticks_within_same_bucket_append_nothing() {
        let (mut state, start) = state_with_start();
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        for seconds in [30i64, 60, 90, 600, 1500] {
            record_phase_tick(
                &mut state,
                start,
                start + TimeDelta::seconds(seconds),
                &config,
                &mut rng,
            );
        }
        assert_eq!(state.phases.len(), 2);
    }

    #[test]
    fn test_missed_ticks_catch_up_whole_buckets() {
        let (mut state, start) = state_with_start();
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        // A single late tick three and a half buckets in records all four
        // entered buckets.
        record_phase_tick(
            &mut state,
            start,
            start + TimeDelta::seconds(3 * 1800 + 900),
            &config,
            &mut rng,
        );
        assert_eq!(state.phases.len(), 1 + 4);
        assert_eq!(state.next_bucket, 4);
    }

    #[test]
    fn test_bucket_boundary_is_exclusive() {
        let (mut state, start) = state_with_start();
        let config = RecorderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        // Exactly at the boundary the new bucket has not been entered yet.
        record_phase_tick(&mut state, start, start + TimeDelta::seconds(1800), &config, &mut rng);
        assert_eq!(state.next_bucket, 1);
    }
}
