// ABOUTME: Demo session simulator for the somnia insights pipeline
// ABOUTME: Seeds a week of synthetic sleep history and prints the weekly summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Demo data simulator for somnia.
//!
//! Generates a week of synthetic sleep sessions plus one fresh "last night"
//! session, stores them in an insights store, and prints the aggregated
//! weekly summary as JSON.
//!
//! Usage:
//! ```bash
//! # Simulate with defaults (7 days of history, ~8h last night)
//! cargo run --bin somnia-simulate
//!
//! # Reproducible output
//! cargo run --bin somnia-simulate -- --seed 42
//!
//! # Shorter last night and more history
//! cargo run --bin somnia-simulate -- --hours 6.5 --history-days 14
//! ```

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use somnia::config::RecorderConfig;
use somnia::insights::{InsightsStore, WeeklySummary};
use somnia::logging::{self, LogFormat, LoggingConfig};
use somnia::models::session::seconds_to_delta;
use somnia::recorder::simulation;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "somnia-simulate",
    about = "Somnia sleep session simulator",
    long_about = "Seed synthetic sleep history and print the aggregated weekly summary"
)]
struct SimulateArgs {
    /// Duration of the most recent night, in hours
    #[arg(long, default_value = "8.0")]
    hours: f64,

    /// Number of days of historical sessions to generate
    #[arg(long, default_value = "7")]
    history_days: u32,

    /// Random seed for reproducible output (entropy-seeded if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = SimulateArgs::parse();

    logging::init(&LoggingConfig {
        level: if args.verbose { "debug".into() } else { "info".into() },
        format: LogFormat::Compact,
    })?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(seed, "simulating sleep history");

    let config = RecorderConfig::from_env()?;
    let store = InsightsStore::new();
    let now = Utc::now();

    // Oldest first so the store ends up newest-first, matching completion order.
    for days_ago in (1..=args.history_days).rev() {
        let bedtime = (now - TimeDelta::days(i64::from(days_ago)))
            - seconds_to_delta(rng.gen_range(0.0..3600.0));
        let wake = bedtime + seconds_to_delta(3600.0 * rng.gen_range(6.0..9.0));
        let session = simulation::synthesize_session(bedtime, wake, &config, &mut rng);
        store.add_session(session)?;
    }

    let last_night_start = now - seconds_to_delta(args.hours * 3600.0);
    let last_night = simulation::synthesize_session(last_night_start, now, &config, &mut rng);
    info!(
        session_id = %last_night.id,
        score = last_night.quality.score,
        rating = last_night.quality.rating.label(),
        "last night synthesized"
    );
    store.add_session(last_night)?;

    let week = store.sessions_for_week(now)?;
    let summary = WeeklySummary::from_sessions(&week);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
