// ABOUTME: In-memory, time-ordered session store with fixed retention
// ABOUTME: Newest-first, capped at thirty sessions, queryable by day and week
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Insights session store
//!
//! Holds finalized sessions for the process lifetime: newest-first, capped
//! at [`MAX_STORED_SESSIONS`] with the oldest evicted on overflow, plus a
//! cached reference to the most recent session. Sessions are immutable once
//! stored; the only mutation is the append performed at finalization.
//!
//! A real deployment would put a persistence collaborator behind this
//! interface; the contract (ordering, cap, day/week queries) holds
//! regardless of backing storage.

use crate::errors::{AppError, AppResult};
use crate::models::SleepSession;
use chrono::{DateTime, Utc, Weekday};
use std::sync::RwLock;
use tracing::debug;

/// Retention cap: the store never holds more sessions than this
pub const MAX_STORED_SESSIONS: usize = 30;

struct StoreState {
    /// Newest-first
    sessions: Vec<SleepSession>,
    latest: Option<SleepSession>,
}

/// In-memory collection of finalized sleep sessions
///
/// Appends take the single write lock, so concurrent readers observe either
/// the pre- or post-append list, never a partial mutation.
pub struct InsightsStore {
    state: RwLock<StoreState>,
}

impl InsightsStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                sessions: Vec::new(),
                latest: None,
            }),
        }
    }

    /// Append a finalized session
    ///
    /// Inserts at the front, truncates to the retention cap, and updates
    /// the latest-session cache.
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn add_session(&self, session: SleepSession) -> AppResult<()> {
        let mut state = self.write()?;
        state.latest = Some(session.clone());
        state.sessions.insert(0, session);
        state.sessions.truncate(MAX_STORED_SESSIONS);
        debug!(total = state.sessions.len(), "sleep session added to insights");
        Ok(())
    }

    /// Most recently finalized session, if any
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn latest_session(&self) -> AppResult<Option<SleepSession>> {
        Ok(self.read()?.latest.clone())
    }

    /// Snapshot of all stored sessions, newest-first
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn sessions(&self) -> AppResult<Vec<SleepSession>> {
        Ok(self.read()?.sessions.clone())
    }

    /// Number of stored sessions
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn len(&self) -> AppResult<usize> {
        Ok(self.read()?.sessions.len())
    }

    /// Whether the store holds no sessions
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.read()?.sessions.is_empty())
    }

    /// Sessions whose date falls in the Monday-start calendar week
    /// containing `anchor`, newest-first
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn sessions_for_week(&self, anchor: DateTime<Utc>) -> AppResult<Vec<SleepSession>> {
        let week = anchor.date_naive().week(Weekday::Mon);
        let (first, last) = (week.first_day(), week.last_day());
        Ok(self
            .read()?
            .sessions
            .iter()
            .filter(|s| {
                let day = s.date.date_naive();
                day >= first && day <= last
            })
            .cloned()
            .collect())
    }

    /// First stored session on the same calendar day as `date`, or None
    ///
    /// # Errors
    /// Returns an error if the store lock is poisoned
    pub fn session_for_date(&self, date: DateTime<Utc>) -> AppResult<Option<SleepSession>> {
        let day = date.date_naive();
        Ok(self
            .read()?
            .sessions
            .iter()
            .find(|s| s.date.date_naive() == day)
            .cloned())
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| AppError::internal("insights store lock poisoned"))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| AppError::internal("insights store lock poisoned"))
    }
}

impl Default for InsightsStore {
    fn default() -> Self {
        Self::new()
    }
}
