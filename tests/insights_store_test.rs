// ABOUTME: Integration tests for the insights store retention and queries
// ABOUTME: Covers the retention cap, ordering, day lookup, and week windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use somnia::insights::{InsightsStore, MAX_STORED_SESSIONS};
use somnia::models::{
    SleepPhase, SleepPhaseType, SleepQualityRating, SleepQualityScore, SleepSession,
};
use uuid::Uuid;

fn session_starting(start: DateTime<Utc>, score: u8) -> SleepSession {
    let end = start + TimeDelta::hours(8);
    SleepSession {
        id: Uuid::new_v4(),
        date: start,
        start_time: start,
        end_time: end,
        phases: vec![SleepPhase {
            phase_type: SleepPhaseType::Light,
            start_time: start,
            duration_seconds: 8.0 * 3600.0,
            percentage: 100.0,
        }],
        sounds: Vec::new(),
        noise_readings: Vec::new(),
        quality: SleepQualityScore {
            score,
            rating: SleepQualityRating::Good,
        },
        goal_duration_seconds: 8.0 * 3600.0,
    }
}

fn night_of(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 22, 30, 0).unwrap()
}

#[test]
fn test_retention_cap_evicts_oldest() {
    let store = InsightsStore::new();
    let mut ids = Vec::new();
    for i in 0..=MAX_STORED_SESSIONS {
        let session = session_starting(night_of(2025, 1, 1) + TimeDelta::days(i as i64), 75);
        ids.push(session.id);
        store.add_session(session).unwrap();
    }

    let sessions = store.sessions().unwrap();
    assert_eq!(sessions.len(), MAX_STORED_SESSIONS);
    // The very first session fell off the back.
    assert!(!sessions.iter().any(|s| s.id == ids[0]));
    assert!(sessions.iter().any(|s| s.id == ids[1]));
}

#[test]
fn test_sessions_are_newest_first() {
    let store = InsightsStore::new();
    let first = session_starting(night_of(2025, 2, 1), 60);
    let second = session_starting(night_of(2025, 2, 2), 70);
    let third = session_starting(night_of(2025, 2, 3), 80);
    let expected = [third.id, second.id, first.id];
    store.add_session(first).unwrap();
    store.add_session(second).unwrap();
    store.add_session(third).unwrap();

    let ids: Vec<_> = store.sessions().unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_latest_session_tracks_appends() {
    let store = InsightsStore::new();
    assert!(store.latest_session().unwrap().is_none());

    let first = session_starting(night_of(2025, 2, 1), 60);
    store.add_session(first.clone()).unwrap();
    assert_eq!(store.latest_session().unwrap().unwrap().id, first.id);

    let second = session_starting(night_of(2025, 2, 2), 70);
    store.add_session(second.clone()).unwrap();
    assert_eq!(store.latest_session().unwrap().unwrap().id, second.id);
}

#[test]
fn test_session_for_date_matches_calendar_day() {
    let store = InsightsStore::new();
    let target = session_starting(night_of(2025, 3, 14), 72);
    store.add_session(session_starting(night_of(2025, 3, 13), 65)).unwrap();
    store.add_session(target.clone()).unwrap();

    let same_day_noon = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    let found = store.session_for_date(same_day_noon).unwrap().unwrap();
    assert_eq!(found.id, target.id);

    let empty_day = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
    assert!(store.session_for_date(empty_day).unwrap().is_none());
}

#[test]
fn test_session_for_date_prefers_most_recent_duplicate() {
    let store = InsightsStore::new();
    let older = session_starting(night_of(2025, 3, 14), 60);
    let newer = session_starting(night_of(2025, 3, 14), 80);
    store.add_session(older).unwrap();
    store.add_session(newer.clone()).unwrap();

    let found = store.session_for_date(night_of(2025, 3, 14)).unwrap().unwrap();
    assert_eq!(found.id, newer.id);
}

#[test]
fn test_sessions_for_week_uses_monday_boundaries() {
    let store = InsightsStore::new();
    // 2025-07-07 is a Monday; the week runs through Sunday 2025-07-13.
    let previous_sunday = session_starting(night_of(2025, 7, 6), 70);
    let monday = session_starting(night_of(2025, 7, 7), 71);
    let sunday = session_starting(night_of(2025, 7, 13), 72);
    let next_monday = session_starting(night_of(2025, 7, 14), 73);
    let in_week = [monday.id, sunday.id];
    for session in [previous_sunday, monday, sunday, next_monday] {
        store.add_session(session).unwrap();
    }

    let anchor = Utc.with_ymd_and_hms(2025, 7, 9, 8, 0, 0).unwrap();
    let week: Vec<_> = store
        .sessions_for_week(anchor)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(week.len(), 2);
    assert!(in_week.iter().all(|id| week.contains(id)));
}
