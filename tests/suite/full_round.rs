//! Whole rounds driven through `App`, the way the frame loop drives it.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use starpick_engine::{Affordance, SessionEvent, SessionPhase};

use crate::common::{NAMES, app, draw_and_settle, run_until_settled};

#[test]
fn individual_round_lands_every_name_then_offers_restart() {
    let mut now = Instant::now();
    let mut app = app(NAMES, 1, 11, now);
    assert_eq!(app.session().phase(), SessionPhase::Idle(Affordance::Start));

    let mut all_events = Vec::new();
    for _ in 0..5 {
        let (later, events) = draw_and_settle(&mut app, now);
        now = later;
        all_events.extend(events);
    }

    assert_eq!(app.session().phase(), SessionPhase::Idle(Affordance::Restart));
    assert!(all_events.iter().any(|e| matches!(e, SessionEvent::RoundComplete)));
    assert_eq!(app.session().hall().settled().len(), 5);

    let export = app.export_text();
    let lines: BTreeSet<&str> = export.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.contains("Ada Lovelace\t1815"));
    assert!(lines.contains("Barbara Liskov\t1939"));
}

#[test]
fn pairs_export_with_group_headers() {
    let mut now = Instant::now();
    let mut app = app(NAMES, 2, 5, now);
    assert_eq!(app.session().pool().total(), 3);

    for _ in 0..3 {
        now = draw_and_settle(&mut app, now).0;
    }

    let export = app.export_text();
    assert_eq!(export.matches("--- Group ").count(), 3);
    assert_eq!(export.lines().filter(|line| line.contains('\t')).count(), 5);
    assert_eq!(app.session().hall().complete_entries().count(), 3);
}

#[test]
fn every_roster_size_exhausts_in_ceiling_draws() {
    let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I"];
    for n in 1..=names.len() {
        for g in 1..=4u8 {
            let text = names[..n].join("\n");
            let mut now = Instant::now();
            let mut app = app(&text, g, (n * 10 + g as usize) as u64, now);

            let mut draws = 0;
            while app.session().phase() != SessionPhase::Idle(Affordance::Restart) {
                now = draw_and_settle(&mut app, now).0;
                draws += 1;
                assert!(draws <= n, "round never completed for n={n} g={g}");
            }

            assert_eq!(draws, n.div_ceil(usize::from(g)), "n={n} g={g}");
            let landed: BTreeSet<&str> = app
                .session()
                .hall()
                .settled()
                .iter()
                .map(|entity| entity.name())
                .collect();
            assert_eq!(landed.len(), n, "n={n} g={g}");
        }
    }
}

#[test]
fn restart_clears_the_board() {
    let mut now = Instant::now();
    let mut app = app("Ada\nGrace\n", 1, 2, now);
    for _ in 0..2 {
        now = draw_and_settle(&mut app, now).0;
    }
    assert_eq!(app.session().hall().len(), 2);

    let events = app.request_draw(now);
    assert!(matches!(events.first(), Some(SessionEvent::RoundReset)));
    assert!(app.session().hall().is_empty());
    assert_eq!(app.session().pool().remaining(), 1);
}

#[test]
fn reshuffle_mid_round_drops_pending_names() {
    let now = Instant::now();
    let mut app = app(NAMES, 1, 8, now);

    app.request_draw(now);
    // Explode but stop before anything settles.
    let later = now + Duration::from_millis(10);
    app.tick(later);
    assert_eq!(app.session().phase(), SessionPhase::Idle(Affordance::Continue));
    assert!(!app.session().scheduler().is_empty());

    app.reshuffle(later);
    assert_eq!(app.session().phase(), SessionPhase::Idle(Affordance::Start));
    assert!(app.session().scheduler().is_empty());

    let (_, events) = run_until_settled(&mut app, later);
    assert!(events.is_empty());
    assert!(app.session().hall().is_empty());
    assert_eq!(app.view().status.as_ref().map(|s| s.message()), Some("Reshuffled"));
}

#[test]
fn mode_cycle_is_refused_while_animating() {
    let now = Instant::now();
    let mut app = app(NAMES, 1, 4, now);

    app.request_draw(now);
    assert_eq!(app.session().phase(), SessionPhase::Animating);
    app.cycle_mode(now);
    assert!(app.session().group_size().is_individual());

    run_until_settled(&mut app, now);
    app.cycle_mode(now);
    assert_eq!(app.session().group_size().get(), 2);
    assert_eq!(
        app.view().status.as_ref().map(|s| s.message()),
        Some("Mode: Groups of 2")
    );
}
