//! Session scenario tests for the engine crate.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    Affordance, DrawnGroup, Entity, GroupSize, HallEntry, Session, SessionEvent, SessionPhase,
    SlotIndex, Timing, Viewport,
};

const VIEWPORT: Viewport = Viewport::new(100.0, 60.0);

/// Rockets arrive on the first tick; pause and rise are short.
fn fast_timing() -> Timing {
    Timing {
        pause: Duration::from_millis(100),
        rise: Duration::from_millis(100),
        flight_speed: 1_000_000.0,
        ..Timing::default()
    }
}

fn roster(names: &[&str]) -> Vec<Entity> {
    names.iter().map(|name| Entity::named(*name).unwrap()).collect()
}

fn session(names: &[&str], size: u8, seed: u64) -> (Session, StdRng) {
    let mut rng = StdRng::seed_from_u64(seed);
    let session = Session::new(roster(names), GroupSize::new(size).unwrap(), &mut rng)
        .unwrap()
        .with_timing(fast_timing());
    (session, rng)
}

fn draw(session: &mut Session, rng: &mut StdRng, now: Instant) -> Arc<DrawnGroup> {
    session
        .start_picking(now, VIEWPORT, rng)
        .into_iter()
        .find_map(|event| match event {
            SessionEvent::DrawStarted { group, .. } => Some(group),
            _ => None,
        })
        .expect("draw should be accepted")
}

/// Tick just past the flight stage.
fn explode(session: &mut Session, now: Instant) -> (Instant, Vec<SessionEvent>) {
    let later = now + Duration::from_millis(1);
    (later, session.tick(later, VIEWPORT))
}

/// Tick far enough that every outstanding record settles.
fn settle(session: &mut Session, now: Instant) -> (Instant, Vec<SessionEvent>) {
    let later = now + Duration::from_secs(5);
    let mut events = session.tick(later, VIEWPORT);
    // Rise targets resolve on the first rise tick; give the records one more.
    let later = later + Duration::from_secs(5);
    events.extend(session.tick(later, VIEWPORT));
    (later, events)
}

#[test]
fn five_individuals_fill_slots_in_draw_order() {
    let (mut session, mut rng) = session(&["A", "B", "C", "D", "E"], 1, 7);
    let mut now = Instant::now();
    let mut slots = Vec::new();
    let mut names = HashSet::new();

    for _ in 0..5 {
        let group = draw(&mut session, &mut rng, now);
        assert_eq!(group.members().len(), 1);
        slots.push(group.slot().value());
        names.insert(group.members()[0].name().to_string());
        (now, _) = explode(&mut session, now);
    }

    assert_eq!(slots, vec![0, 1, 2, 3, 4]);
    assert_eq!(names.len(), 5);
    assert!(session.pool().is_exhausted());
}

#[test]
fn nine_entities_in_fours_make_three_groups() {
    let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I"];
    let (session, _) = session(&names, 4, 3);
    let sizes: Vec<usize> = session.pool().all().iter().map(|g| g.len()).collect();
    assert_eq!(sizes, vec![4, 4, 1]);
}

#[test]
fn draw_is_ignored_while_animating() {
    let (mut session, mut rng) = session(&["A", "B", "C"], 1, 1);
    let now = Instant::now();
    assert!(session.can_draw());
    assert_eq!(session.affordance(), Some(Affordance::Start));

    draw(&mut session, &mut rng, now);
    assert_eq!(session.phase(), SessionPhase::Animating);
    assert!(!session.can_draw());
    assert!(session.start_picking(now, VIEWPORT, &mut rng).is_empty());
    assert_eq!(session.pool().remaining(), 2);
    assert_eq!(session.next_slot().value(), 1);
}

#[test]
fn control_returns_when_rockets_explode() {
    let (mut session, mut rng) = session(&["A", "B", "C"], 1, 1);
    let now = Instant::now();
    draw(&mut session, &mut rng, now);

    let (_, events) = explode(&mut session, now);
    assert!(events.iter().any(|e| matches!(e, SessionEvent::Exploded { .. })));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::ControlReady(Affordance::Continue)))
    );
    assert_eq!(session.phase(), SessionPhase::Idle(Affordance::Continue));
    // The name is still pausing at the explosion point.
    assert_eq!(session.scheduler().len(), 1);
    assert!(session.hall().is_empty());
}

#[test]
fn slots_are_reserved_at_draw_time() {
    let (mut session, mut rng) = session(&["A", "B", "C"], 1, 5);
    let start = Instant::now();
    let first = draw(&mut session, &mut rng, start);
    let (now, _) = explode(&mut session, start);
    let second = draw(&mut session, &mut rng, now);

    assert_eq!(first.slot().value(), 0);
    assert_eq!(second.slot().value(), 1);

    settle(&mut session, now);
    let hall = session.hall();
    let slots: Vec<usize> = hall.entries().map(|e| e.slot().value()).collect();
    assert_eq!(slots, vec![0, 1]);
    assert_eq!(
        hall.entries().next().unwrap().group().members(),
        first.members()
    );
}

#[test]
fn last_draw_settles_before_restart() {
    let (mut session, mut rng) = session(&["A", "B"], 1, 2);
    let now = Instant::now();
    draw(&mut session, &mut rng, now);
    let (now, _) = explode(&mut session, now);
    draw(&mut session, &mut rng, now);

    let (now, events) = explode(&mut session, now);
    assert!(!events.iter().any(|e| matches!(e, SessionEvent::ControlReady(_))));
    assert_eq!(session.phase(), SessionPhase::Settling);
    assert!(!session.can_draw());
    assert!(!session.is_round_complete());

    let (_, events) = settle(&mut session, now);
    assert!(events.iter().any(|e| matches!(e, SessionEvent::RoundComplete)));
    assert_eq!(session.phase(), SessionPhase::Idle(Affordance::Restart));
    assert!(session.is_round_complete());
    assert_eq!(session.hall().len(), 2);
}

#[test]
fn draw_after_round_complete_starts_new_round() {
    let (mut session, mut rng) = session(&["A", "B"], 1, 4);
    let mut now = Instant::now();
    for _ in 0..2 {
        draw(&mut session, &mut rng, now);
        (now, _) = explode(&mut session, now);
    }
    settle(&mut session, now);
    assert_eq!(session.affordance(), Some(Affordance::Restart));

    let events = session.start_picking(now, VIEWPORT, &mut rng);
    assert!(matches!(events.first(), Some(SessionEvent::RoundReset)));
    let group = events
        .iter()
        .find_map(|e| match e {
            SessionEvent::DrawStarted { group, .. } => Some(group),
            _ => None,
        })
        .unwrap();
    assert_eq!(group.slot().value(), 0);
    assert!(session.hall().is_empty());
    assert_eq!(session.pool().remaining(), 1);
}

#[test]
fn round_reset_keeps_the_same_entities() {
    let names = ["A", "B", "C", "D", "E"];
    let (mut session, mut rng) = session(&names, 2, 8);
    let before: HashSet<String> = session
        .pool()
        .all()
        .iter()
        .flat_map(|g| g.members().iter().map(|m| m.name().to_string()))
        .collect();

    assert!(session.reshuffle(&mut rng).unwrap());
    let after: HashSet<String> = session
        .pool()
        .all()
        .iter()
        .flat_map(|g| g.members().iter().map(|m| m.name().to_string()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(session.pool().remaining(), 3);
}

#[test]
fn group_members_settle_into_one_entry() {
    let (mut session, mut rng) = session(&["A", "B", "C", "D"], 2, 6);
    let now = Instant::now();
    let group = draw(&mut session, &mut rng, now);
    let (now, _) = explode(&mut session, now);
    let (_, events) = settle(&mut session, now);

    let settled = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::MemberSettled { .. }))
        .count();
    assert_eq!(settled, 2);
    assert!(
        events
            .iter()
            .any(|e| matches!(
                e,
                SessionEvent::GroupCompleted { group: g } if g.slot() == group.slot()
            ))
    );
    assert!(session.hall().get(group.slot()).unwrap().is_complete());
}

#[test]
fn export_lists_only_completed_groups() {
    let names = ["A", "B", "C", "D", "E", "F"];
    let (mut session, mut rng) = session(&names, 2, 9);
    let mut now = Instant::now();

    let mut completed = Vec::new();
    for _ in 0..2 {
        completed.push(draw(&mut session, &mut rng, now));
        (now, _) = explode(&mut session, now);
        (now, _) = settle(&mut session, now);
    }
    let pending = draw(&mut session, &mut rng, now);
    explode(&mut session, now);

    let text = session.export_text();
    assert_eq!(text.matches("--- Group").count(), 2);
    for group in &completed {
        assert!(text.contains(&format!("--- Group {} ---", group.id())));
    }
    for member in pending.members() {
        assert!(!text.contains(member.name()));
    }
}

#[test]
fn reshuffle_cancels_pending_effects() {
    let (mut session, mut rng) = session(&["A", "B", "C", "D", "E", "F"], 2, 10);
    let now = Instant::now();
    draw(&mut session, &mut rng, now);
    let (now, _) = explode(&mut session, now);
    assert_eq!(session.scheduler().len(), 2);

    assert!(session.reshuffle(&mut rng).unwrap());
    assert!(session.scheduler().is_empty());
    assert!(session.hall().is_empty());
    assert_eq!(session.affordance(), Some(Affordance::Start));

    let (_, events) = settle(&mut session, now);
    assert!(events.is_empty());
    assert!(session.hall().is_empty());
}

/// Step 1ms at a time until one member of a pair has landed and the control
/// is back. `None` when the pair never splits that way for this seed.
fn first_of_pair_settled(seed: u64) -> Option<(Session, StdRng, Instant, SlotIndex)> {
    let (session, mut rng) = session(&["A", "B", "C", "D"], 2, seed);
    let mut session = session.with_timing(Timing {
        flight_speed: 40.0,
        ..fast_timing()
    });
    let start = Instant::now();
    let slot = draw(&mut session, &mut rng, start).slot();

    let mut now = start;
    while now < start + Duration::from_secs(30) {
        now += Duration::from_millis(1);
        session.tick(now, VIEWPORT);
        let landed = session.hall().get(slot).map(HallEntry::is_complete);
        match landed {
            Some(true) => return None,
            Some(false) if session.can_draw() => return Some((session, rng, now, slot)),
            _ => {}
        }
    }
    None
}

#[test]
fn reset_discards_partially_landed_group() {
    let (mut session, mut rng, now, slot) = (0..8)
        .find_map(first_of_pair_settled)
        .expect("pair members should land at different times");

    let entry = session.hall().get(slot).unwrap();
    assert_eq!(entry.collected().count(), 1);
    assert_eq!(session.scheduler().len(), 1);

    assert!(session.reshuffle(&mut rng).unwrap());
    assert!(session.hall().is_empty());
    assert!(session.hall().settled().is_empty());
    assert!(session.scheduler().is_empty());

    let events = session.tick(now + Duration::from_secs(10), VIEWPORT);
    assert!(events.is_empty());
    assert!(session.hall().get(slot).is_none());
}

#[test]
fn mode_switch_cycles_size_and_resets() {
    let (mut session, mut rng) = session(&["A", "B", "C", "D", "E"], 1, 11);
    let now = Instant::now();
    draw(&mut session, &mut rng, now);
    assert_eq!(session.switch_mode(&mut rng).unwrap(), None);

    let (now, _) = explode(&mut session, now);
    assert_eq!(
        session.switch_mode(&mut rng).unwrap(),
        Some(GroupSize::new(2).unwrap())
    );
    assert_eq!(session.next_slot().value(), 0);
    assert_eq!(session.pool().total(), 3);
    assert!(session.scheduler().is_empty());

    for expected in [3, 4, 1] {
        let size = session.switch_mode(&mut rng).unwrap().unwrap();
        assert_eq!(size.get(), expected);
    }
    let (_, events) = settle(&mut session, now);
    assert!(events.is_empty());
}

#[test]
fn empty_roster_is_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(Session::new(Vec::new(), GroupSize::INDIVIDUAL, &mut rng).is_err());
}
