//! Core engine for Starpick - draw state machine and effect orchestration.
//!
//! This crate contains the session and app state without TUI dependencies.
//! Rendering reads it through accessors and reacts to [`SessionEvent`]s.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod app;
mod config;
mod grouping;
mod hall_of_fame;
mod layout;
mod roster;
mod scheduler;
mod session;

pub use app::{App, mode_label};
pub use config::{
    AppConfig, ConfigError, DEFAULT_ROSTER_FILE, ROSTER_ENV, RosterConfig, StarpickConfig,
    TimingConfig, config_path, expand_env_vars, expand_path, resolve_roster_path,
};
pub use grouping::{GroupPool, create_groups};
pub use hall_of_fame::{Arrival, HallEntry, HallOfFame};
pub use layout::{LayoutMetrics, SlotPosition, slot_position};
pub use roster::{Roster, RosterError, parse_line, parse_roster};
pub use scheduler::{AdvanceContext, EffectRecord, Scheduler, StageOutcome, Timing};
pub use session::{Session, SessionEvent, SessionPhase};

pub use starpick_types::{
    Affordance, DrawStage, DrawnGroup, EmptyStringError, Entity, Group, GroupId, GroupSize,
    GroupSizeError, NonEmptyString, Point, SlotIndex, TaskId, Viewport, ui,
};

#[cfg(test)]
mod tests;
