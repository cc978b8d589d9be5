//! Deferred effect scheduler.
//!
//! Every drawn member gets one [`EffectRecord`] that walks through three
//! stages, advanced by [`Scheduler::advance`] once per frame:
//!
//! ```text
//! ┌──────────┐ within threshold ┌──────────┐ pause elapsed ┌──────────┐ rise elapsed
//! │ Flight   │ ───────────────> │ Pause    │ ────────────> │ Rise     │ ────────────> [settled]
//! └──────────┘   (Exploded)     └──────────┘               └──────────┘
//! ```
//!
//! Stage boundaries are computed from the stage's own start instant, not from
//! the tick that observed them, so a slow frame never stretches the timeline.
//! Cancelling a record removes it from the map; nothing fires afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::distr::{Distribution, StandardUniform};

use starpick_types::ui::{EffectTimer, ease_in_out_quad, lerp};
use starpick_types::{DrawStage, DrawnGroup, Entity, GroupSize, Point, TaskId, Viewport};

use crate::layout::LayoutMetrics;

/// Distance off-screen that rockets launch from.
const LAUNCH_MARGIN: f32 = 50.0;

/// Stage timing and motion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// How long a name hangs at the explosion point.
    pub pause: Duration,
    /// Duration of the eased rise into the hall of fame.
    pub rise: Duration,
    /// Rocket speed in display units per second.
    pub flight_speed: f32,
    /// Flight ends once the rocket is closer than this to its target.
    pub flight_threshold: f32,
    pub start_font: f32,
    pub end_font: f32,
    /// Horizontal distance between members' explosion points.
    pub member_spacing: f32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(2500),
            rise: Duration::from_millis(2500),
            flight_speed: 60.0,
            flight_threshold: 2.0,
            start_font: 64.0,
            end_font: 22.0,
            member_spacing: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    origin: Point,
    target: Point,
    started_at: Instant,
    speed: f32,
    arrives_at: Instant,
}

impl Flight {
    fn new(origin: Point, target: Point, started_at: Instant, timing: &Timing) -> Self {
        let speed = timing.flight_speed.max(f32::EPSILON);
        let travel = (origin.distance(target) - timing.flight_threshold).max(0.0);
        let arrives_at = started_at + Duration::from_secs_f32(travel / speed);
        Self {
            origin,
            target,
            started_at,
            speed,
            arrives_at,
        }
    }

    fn position(&self, now: Instant) -> Point {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f32();
        self.origin.toward(self.target, self.speed * elapsed)
    }
}

#[derive(Debug, Clone, Copy)]
enum StageState {
    Flight(Flight),
    Pause {
        at: Point,
        timer: EffectTimer,
    },
    Rise {
        from: Point,
        timer: EffectTimer,
        /// Resolved on the first tick spent in this stage.
        target: Option<Point>,
    },
}

/// One member's animation, from launch to hall-of-fame placement.
#[derive(Debug, Clone)]
pub struct EffectRecord {
    id: TaskId,
    group: Arc<DrawnGroup>,
    member_index: usize,
    stage: StageState,
    start_font: f32,
    end_font: f32,
}

impl EffectRecord {
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn group(&self) -> &Arc<DrawnGroup> {
        &self.group
    }

    #[must_use]
    pub fn member_index(&self) -> usize {
        self.member_index
    }

    #[must_use]
    pub fn member(&self) -> Option<&Entity> {
        self.group.member(self.member_index)
    }

    #[must_use]
    pub fn stage(&self) -> DrawStage {
        match self.stage {
            StageState::Flight(_) => DrawStage::Flight,
            StageState::Pause { .. } => DrawStage::Pause,
            StageState::Rise { .. } => DrawStage::Rise,
        }
    }

    /// When the current stage began.
    #[must_use]
    pub fn stage_started_at(&self) -> Instant {
        match self.stage {
            StageState::Flight(flight) => flight.started_at,
            StageState::Pause { timer, .. } | StageState::Rise { timer, .. } => timer.started_at(),
        }
    }

    /// Rise target, once it has been resolved.
    #[must_use]
    pub fn rise_target(&self) -> Option<Point> {
        match self.stage {
            StageState::Rise { target, .. } => target,
            _ => None,
        }
    }

    #[must_use]
    pub fn position(&self, now: Instant) -> Point {
        match self.stage {
            StageState::Flight(flight) => flight.position(now),
            StageState::Pause { at, .. } => at,
            StageState::Rise {
                from,
                timer,
                target,
            } => match target {
                Some(target) => from.lerp(target, ease_in_out_quad(timer.progress(now))),
                None => from,
            },
        }
    }

    #[must_use]
    pub fn font_size(&self, now: Instant) -> f32 {
        match self.stage {
            StageState::Flight(_) | StageState::Pause { .. } => self.start_font,
            StageState::Rise { timer, .. } => lerp(
                self.start_font,
                self.end_font,
                ease_in_out_quad(timer.progress(now)),
            ),
        }
    }

    fn step(&mut self, now: Instant, ctx: &AdvanceContext<'_>) -> Step {
        match &mut self.stage {
            StageState::Flight(flight) => {
                if now < flight.arrives_at {
                    return Step::Wait;
                }
                let at = flight.target;
                let exploded_at = flight.arrives_at;
                self.stage = StageState::Pause {
                    at,
                    timer: EffectTimer::new(exploded_at, ctx.timing.pause),
                };
                Step::Advanced(Transition::Exploded { at })
            }
            StageState::Pause { at, timer } => {
                if !timer.is_finished(now) {
                    return Step::Wait;
                }
                let from = *at;
                let rise_start = timer.ends_at();
                self.stage = StageState::Rise {
                    from,
                    timer: EffectTimer::new(rise_start, ctx.timing.rise),
                    target: None,
                };
                Step::Advanced(Transition::Paused)
            }
            StageState::Rise { timer, target, .. } => {
                if target.is_none() {
                    let resolved = ctx.layout.member_position(
                        self.group.slot(),
                        ctx.size,
                        self.member_index,
                        ctx.screen_width,
                    );
                    *target = Some(resolved);
                    return Step::Advanced(Transition::RiseStarted { target: resolved });
                }
                if timer.is_finished(now) {
                    Step::Finished
                } else {
                    Step::Wait
                }
            }
        }
    }
}

enum Transition {
    Exploded { at: Point },
    Paused,
    RiseStarted { target: Point },
}

enum Step {
    Wait,
    Advanced(Transition),
    Finished,
}

/// Everything a record needs from the outside world to advance.
#[derive(Debug, Clone, Copy)]
pub struct AdvanceContext<'a> {
    pub timing: &'a Timing,
    pub layout: &'a LayoutMetrics,
    pub size: GroupSize,
    pub screen_width: f32,
}

/// Stage changes observed during one [`Scheduler::advance`] call.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    Exploded {
        task: TaskId,
        group: Arc<DrawnGroup>,
        member_index: usize,
        at: Point,
    },
    RiseStarted {
        task: TaskId,
        group: Arc<DrawnGroup>,
        member_index: usize,
        target: Point,
    },
    Settled {
        task: TaskId,
        group: Arc<DrawnGroup>,
        member_index: usize,
    },
}

#[derive(Debug, Default)]
pub struct Scheduler {
    records: BTreeMap<TaskId, EffectRecord>,
    next_id: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch one rocket per member of `group`, converging on `explosion`.
    ///
    /// Members are spread horizontally around the shared point so their
    /// names land side by side.
    pub fn launch<R>(
        &mut self,
        group: &Arc<DrawnGroup>,
        explosion: Point,
        viewport: Viewport,
        now: Instant,
        timing: &Timing,
        rng: &mut R,
    ) -> Vec<TaskId>
    where
        R: Rng + ?Sized,
    {
        let count = group.members().len();
        let center = (count.saturating_sub(1)) as f32 / 2.0;
        (0..count)
            .map(|member_index| {
                let offset = (member_index as f32 - center) * timing.member_spacing;
                let target = Point::new(explosion.x + offset, explosion.y);
                let origin = launch_origin(viewport, rng);
                self.insert(EffectRecord {
                    id: TaskId::new(0),
                    group: Arc::clone(group),
                    member_index,
                    stage: StageState::Flight(Flight::new(origin, target, now, timing)),
                    start_font: timing.start_font,
                    end_font: timing.end_font,
                })
            })
            .collect()
    }

    fn insert(&mut self, mut record: EffectRecord) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        record.id = id;
        tracing::debug!(
            task = %id,
            slot = %record.group.slot(),
            member = record.member_index,
            "Effect scheduled"
        );
        self.records.insert(id, record);
        id
    }

    /// Advance every record to `now`. A record may cross several stage
    /// boundaries in one call if the frame was late.
    pub fn advance(&mut self, now: Instant, ctx: &AdvanceContext<'_>) -> Vec<StageOutcome> {
        let mut outcomes = Vec::new();
        let ids: Vec<TaskId> = self.records.keys().copied().collect();

        for id in ids {
            loop {
                let Some(record) = self.records.get_mut(&id) else {
                    // Cancelled while we were iterating.
                    break;
                };
                match record.step(now, ctx) {
                    Step::Wait => break,
                    Step::Advanced(transition) => {
                        let group = Arc::clone(&record.group);
                        let member_index = record.member_index;
                        match transition {
                            Transition::Exploded { at } => {
                                tracing::debug!(task = %id, "Rocket exploded");
                                outcomes.push(StageOutcome::Exploded {
                                    task: id,
                                    group,
                                    member_index,
                                    at,
                                });
                            }
                            Transition::Paused => {}
                            Transition::RiseStarted { target } => {
                                outcomes.push(StageOutcome::RiseStarted {
                                    task: id,
                                    group,
                                    member_index,
                                    target,
                                });
                            }
                        }
                    }
                    Step::Finished => {
                        if let Some(record) = self.records.remove(&id) {
                            tracing::debug!(task = %id, "Effect settled");
                            outcomes.push(StageOutcome::Settled {
                                task: id,
                                group: record.group,
                                member_index: record.member_index,
                            });
                        }
                        break;
                    }
                }
            }
        }

        outcomes
    }

    /// Cancel one record. Returns `false` if it already finished or was
    /// cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.records.remove(&id).is_some()
    }

    /// Cancel every outstanding record in one pass.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.records.len();
        self.records.clear();
        if cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled outstanding effects");
        }
        cancelled
    }

    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&EffectRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &EffectRecord> {
        self.records.values()
    }

    /// Number of rockets still in the air.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.records
            .values()
            .filter(|record| record.stage() == DrawStage::Flight)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn unit<R>(rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    StandardUniform.sample(rng)
}

pub(crate) fn uniform<R>(rng: &mut R, low: f32, high: f32) -> f32
where
    R: Rng + ?Sized,
{
    low + (high - low) * unit(rng)
}

/// Off-screen launch point: bottom edge half the time, otherwise the lower
/// part of the left or right edge.
fn launch_origin<R>(viewport: Viewport, rng: &mut R) -> Point
where
    R: Rng + ?Sized,
{
    let Viewport { width, height } = viewport;
    let side_y = |rng: &mut R| uniform(rng, height * 0.75, height + LAUNCH_MARGIN);
    let roll = unit(rng);
    if roll < 0.5 {
        Point::new(uniform(rng, 0.0, width), height + LAUNCH_MARGIN)
    } else if roll < 0.75 {
        Point::new(-LAUNCH_MARGIN, side_y(rng))
    } else {
        Point::new(width + LAUNCH_MARGIN, side_y(rng))
    }
}
