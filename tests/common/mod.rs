//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use starpick_engine::ui::UiOptions;
use starpick_engine::{App, GroupSize, Roster, SessionEvent, SessionPhase, Timing};

pub const NAMES: &str = "\
Ada Lovelace 1815
Grace Hopper 1906
Alan Turing 1912
Edsger Dijkstra 1930
Barbara Liskov 1939
";

/// Rockets arrive on the first tick; pause and rise take 100ms each.
pub fn fast_timing() -> Timing {
    Timing {
        pause: Duration::from_millis(100),
        rise: Duration::from_millis(100),
        flight_speed: 1_000_000.0,
        ..Timing::default()
    }
}

pub fn roster(text: &str) -> Roster {
    Roster::from_text(text, "fixture").expect("fixture roster parses")
}

pub fn app(text: &str, size: u8, seed: u64, now: Instant) -> App {
    app_with_options(text, size, seed, now, UiOptions::default())
}

pub fn app_with_options(text: &str, size: u8, seed: u64, now: Instant, options: UiOptions) -> App {
    App::with_rng(
        roster(text),
        GroupSize::new(size).expect("valid group size"),
        fast_timing(),
        options,
        now,
        StdRng::seed_from_u64(seed),
    )
    .expect("app builds")
}

/// Tick in 50ms steps until every record has settled.
pub fn run_until_settled(app: &mut App, mut now: Instant) -> (Instant, Vec<SessionEvent>) {
    let mut events = Vec::new();
    for _ in 0..200 {
        now += Duration::from_millis(50);
        events.extend(app.tick(now));
        let session = app.session();
        if session.scheduler().is_empty() && session.phase() != SessionPhase::Animating {
            break;
        }
    }
    (now, events)
}

/// Draw and let the whole group land.
pub fn draw_and_settle(app: &mut App, now: Instant) -> (Instant, Vec<SessionEvent>) {
    let mut events = app.request_draw(now);
    assert!(!events.is_empty(), "draw should be accepted");
    let (now, settled) = run_until_settled(app, now);
    events.extend(settled);
    (now, events)
}
