//! Selector / draw state machine.
//!
//! `Session` owns everything a round needs: the undrawn pool, the slot
//! counter, the effect scheduler and the hall of fame. The frontend calls
//! [`Session::start_picking`] on the trigger and [`Session::tick`] once per
//! frame, and renders from the returned [`SessionEvent`]s plus read-only
//! accessors.
//!
//! ```text
//!            start_picking                 last flight done, pool left
//! Idle(_) ────────────────> Animating ──────────────────────────────> Idle(Continue)
//!    ^                          │
//!    │                          │ last flight done, pool empty
//!    │                          v
//!    └──── Idle(Restart) <── Settling   (all records settled)
//! ```

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use starpick_types::{
    Affordance, DrawnGroup, Entity, GroupSize, Point, SlotIndex, TaskId, Viewport,
};

use crate::grouping::{GroupPool, create_groups};
use crate::hall_of_fame::{Arrival, HallOfFame};
use crate::layout::LayoutMetrics;
use crate::roster::RosterError;
use crate::scheduler::{AdvanceContext, Scheduler, StageOutcome, Timing, uniform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Draw accepted.
    Idle(Affordance),
    /// Rockets of the latest draw are still in the air.
    Animating,
    /// Pool is empty; waiting for the remaining names to settle.
    Settling,
}

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The pool was refilled and the board cleared.
    RoundReset,
    DrawStarted {
        group: Arc<DrawnGroup>,
        explosion: Point,
        tasks: Vec<TaskId>,
    },
    Exploded {
        group: Arc<DrawnGroup>,
        member_index: usize,
        at: Point,
    },
    RiseStarted {
        group: Arc<DrawnGroup>,
        member_index: usize,
        target: Point,
    },
    MemberSettled {
        group: Arc<DrawnGroup>,
        member_index: usize,
    },
    GroupCompleted {
        group: Arc<DrawnGroup>,
    },
    /// The trigger is enabled again.
    ControlReady(Affordance),
    /// Pool empty and nothing left in flight.
    RoundComplete,
}

#[derive(Debug)]
pub struct Session {
    roster: Vec<Entity>,
    size: GroupSize,
    pool: GroupPool,
    next_slot: usize,
    phase: SessionPhase,
    scheduler: Scheduler,
    hall: HallOfFame,
    layout: LayoutMetrics,
    timing: Timing,
}

impl Session {
    /// Group `roster` and start idle. Fails on an empty roster.
    pub fn new<R>(roster: Vec<Entity>, size: GroupSize, rng: &mut R) -> Result<Self, RosterError>
    where
        R: Rng + ?Sized,
    {
        let pool = create_groups(&roster, size, rng)?;
        Ok(Self {
            roster,
            size,
            pool,
            next_slot: 0,
            phase: SessionPhase::Idle(Affordance::Start),
            scheduler: Scheduler::new(),
            hall: HallOfFame::new(),
            layout: LayoutMetrics::default(),
            timing: Timing::default(),
        })
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Trigger label, or `None` while the control is disabled.
    #[must_use]
    pub fn affordance(&self) -> Option<Affordance> {
        match self.phase {
            SessionPhase::Idle(affordance) => Some(affordance),
            SessionPhase::Animating | SessionPhase::Settling => None,
        }
    }

    #[must_use]
    pub fn can_draw(&self) -> bool {
        matches!(self.phase, SessionPhase::Idle(_))
    }

    #[must_use]
    pub fn group_size(&self) -> GroupSize {
        self.size
    }

    #[must_use]
    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    #[must_use]
    pub fn pool(&self) -> &GroupPool {
        &self.pool
    }

    /// Slot the next draw will reserve.
    #[must_use]
    pub fn next_slot(&self) -> SlotIndex {
        SlotIndex::new(self.next_slot)
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn hall(&self) -> &HallOfFame {
        &self.hall
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    #[must_use]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Pop a random group and launch its rockets.
    ///
    /// Ignored unless idle. An exhausted pool starts a new round first.
    pub fn start_picking<R>(
        &mut self,
        now: Instant,
        viewport: Viewport,
        rng: &mut R,
    ) -> Vec<SessionEvent>
    where
        R: Rng + ?Sized,
    {
        if !self.can_draw() {
            tracing::debug!(phase = ?self.phase, "Draw ignored");
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.pool.is_exhausted() {
            self.reset_round();
            events.push(SessionEvent::RoundReset);
        }

        let Some(group) = self.pool.draw(rng) else {
            return events;
        };

        let slot = SlotIndex::new(self.next_slot);
        self.next_slot += 1;
        let drawn = Arc::new(DrawnGroup::new(group, slot));

        let explosion = Point::new(
            viewport.width / 2.0,
            uniform(rng, viewport.height * 0.4, viewport.height * 0.6),
        );
        let tasks = self
            .scheduler
            .launch(&drawn, explosion, viewport, now, &self.timing, rng);
        self.phase = SessionPhase::Animating;

        tracing::debug!(
            group = %drawn.id(),
            slot = %slot,
            members = drawn.members().len(),
            remaining = self.pool.remaining(),
            "Draw started"
        );
        events.push(SessionEvent::DrawStarted {
            group: drawn,
            explosion,
            tasks,
        });
        events
    }

    /// Advance every effect to `now` and settle phase transitions.
    pub fn tick(&mut self, now: Instant, viewport: Viewport) -> Vec<SessionEvent> {
        let ctx = AdvanceContext {
            timing: &self.timing,
            layout: &self.layout,
            size: self.size,
            screen_width: viewport.width,
        };
        let outcomes = self.scheduler.advance(now, &ctx);

        let mut events = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                StageOutcome::Exploded {
                    group,
                    member_index,
                    at,
                    ..
                } => events.push(SessionEvent::Exploded {
                    group,
                    member_index,
                    at,
                }),
                StageOutcome::RiseStarted {
                    group,
                    member_index,
                    target,
                    ..
                } => events.push(SessionEvent::RiseStarted {
                    group,
                    member_index,
                    target,
                }),
                StageOutcome::Settled {
                    group,
                    member_index,
                    ..
                } => match self.hall.record(&group, member_index) {
                    Arrival::Duplicate => {}
                    Arrival::Partial => {
                        events.push(SessionEvent::MemberSettled {
                            group,
                            member_index,
                        });
                    }
                    Arrival::Completed => {
                        tracing::debug!(
                            group = %group.id(),
                            slot = %group.slot(),
                            "Group completed"
                        );
                        events.push(SessionEvent::MemberSettled {
                            group: Arc::clone(&group),
                            member_index,
                        });
                        events.push(SessionEvent::GroupCompleted { group });
                    }
                },
            }
        }

        self.update_phase(&mut events);
        events
    }

    fn update_phase(&mut self, events: &mut Vec<SessionEvent>) {
        if self.phase == SessionPhase::Animating && self.scheduler.in_flight() == 0 {
            if self.pool.is_exhausted() {
                self.phase = SessionPhase::Settling;
            } else {
                self.phase = SessionPhase::Idle(Affordance::Continue);
                events.push(SessionEvent::ControlReady(Affordance::Continue));
            }
        }

        if self.phase == SessionPhase::Settling && self.is_round_complete() {
            self.phase = SessionPhase::Idle(Affordance::Restart);
            tracing::info!(groups = self.pool.total(), "Round complete");
            events.push(SessionEvent::RoundComplete);
            events.push(SessionEvent::ControlReady(Affordance::Restart));
        }
    }

    /// Pool empty and nothing left to settle.
    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        self.pool.is_exhausted() && self.scheduler.is_empty()
    }

    /// Cycle 1 -> 2 -> 3 -> 4 -> 1 and regroup.
    ///
    /// Returns the new size, or `None` if the session was busy.
    pub fn switch_mode<R>(&mut self, rng: &mut R) -> Result<Option<GroupSize>, RosterError>
    where
        R: Rng + ?Sized,
    {
        if !self.can_draw() {
            return Ok(None);
        }
        let size = self.size.next();
        self.regroup(size, rng)?;
        tracing::info!(size = %size, "Group size changed");
        Ok(Some(size))
    }

    /// Regroup with the current size. Returns `false` if the session was busy.
    pub fn reshuffle<R>(&mut self, rng: &mut R) -> Result<bool, RosterError>
    where
        R: Rng + ?Sized,
    {
        if !self.can_draw() {
            return Ok(false);
        }
        self.regroup(self.size, rng)?;
        tracing::info!(groups = self.pool.total(), "Roster reshuffled");
        Ok(true)
    }

    fn regroup<R>(&mut self, size: GroupSize, rng: &mut R) -> Result<(), RosterError>
    where
        R: Rng + ?Sized,
    {
        let pool = create_groups(&self.roster, size, rng)?;
        self.scheduler.cancel_all();
        self.hall.clear();
        self.next_slot = 0;
        self.pool = pool;
        self.size = size;
        self.phase = SessionPhase::Idle(Affordance::Start);
        Ok(())
    }

    fn reset_round(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.hall.clear();
        self.next_slot = 0;
        self.pool.refill();
        tracing::info!(groups = self.pool.total(), cancelled, "New round");
    }

    /// Hall of fame as plain text; see [`HallOfFame::export_text`].
    #[must_use]
    pub fn export_text(&self) -> String {
        self.hall.export_text(self.size)
    }
}
