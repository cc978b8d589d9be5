//! Core domain types for Starpick.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod geometry;
mod ids;
pub mod ui;

pub use geometry::{Point, Viewport};
pub use ids::{GroupId, SlotIndex, TaskId};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("name must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Roster Entities
// ============================================================================

/// One roster record. Identity is positional: two entities with the same
/// name are still distinct picks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    name: NonEmptyString,
    id: Option<String>,
}

impl Entity {
    #[must_use]
    pub fn new(name: NonEmptyString, id: Option<String>) -> Self {
        let id = id.filter(|id| !id.trim().is_empty());
        Self { name, id }
    }

    /// Name-only entity.
    pub fn named(name: impl Into<String>) -> Result<Self, EmptyStringError> {
        Ok(Self::new(NonEmptyString::new(name)?, None))
    }

    pub fn with_id(
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<Self, EmptyStringError> {
        Ok(Self::new(NonEmptyString::new(name)?, Some(id.into())))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// `name (id)`, or the bare name.
    #[must_use]
    pub fn list_label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} ({id})", self.name),
            None => self.name.to_string(),
        }
    }

    /// `name<TAB>id`, or the bare name.
    #[must_use]
    pub fn export_line(&self) -> String {
        match &self.id {
            Some(id) => format!("{}\t{id}", self.name),
            None => self.name.to_string(),
        }
    }
}

// ============================================================================
// Group Size
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
#[error("group size must be between 1 and {max} (got {got})", max = GroupSize::MAX)]
pub struct GroupSizeError {
    pub got: u8,
}

/// Number of entities per group. `1` is individual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GroupSize(u8);

impl GroupSize {
    pub const MAX: u8 = 4;
    pub const INDIVIDUAL: Self = Self(1);

    pub fn new(size: u8) -> Result<Self, GroupSizeError> {
        if (1..=Self::MAX).contains(&size) {
            Ok(Self(size))
        } else {
            Err(GroupSizeError { got: size })
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn is_individual(self) -> bool {
        self.0 == 1
    }

    /// Mode cycle: 1 -> 2 -> 3 -> 4 -> 1.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 >= Self::MAX {
            Self::INDIVIDUAL
        } else {
            Self(self.0 + 1)
        }
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        Self::INDIVIDUAL
    }
}

impl TryFrom<u8> for GroupSize {
    type Error = GroupSizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupSize> for u8 {
    fn from(value: GroupSize) -> Self {
        value.0
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Groups
// ============================================================================

/// A partition cell of the roster. Undrawn until it is wrapped in a
/// [`DrawnGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    members: Vec<Entity>,
}

impl Group {
    #[must_use]
    pub fn new(id: GroupId, members: Vec<Entity>) -> Self {
        Self { id, members }
    }

    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[must_use]
    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A group that has been popped from the pool.
///
/// The slot is fixed at draw time; existence of this value proves the
/// reservation happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnGroup {
    group: Group,
    slot: SlotIndex,
}

impl DrawnGroup {
    #[must_use]
    pub fn new(group: Group, slot: SlotIndex) -> Self {
        Self { group, slot }
    }

    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    #[must_use]
    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    #[must_use]
    pub fn id(&self) -> GroupId {
        self.group.id
    }

    #[must_use]
    pub fn members(&self) -> &[Entity] {
        self.group.members()
    }

    #[must_use]
    pub fn member(&self, index: usize) -> Option<&Entity> {
        self.group.members.get(index)
    }
}

// ============================================================================
// Draw lifecycle
// ============================================================================

/// Stage of a single member's post-draw animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStage {
    Flight,
    Pause,
    Rise,
}

/// What the trigger control offers when a draw is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affordance {
    /// Fresh session or mode switch.
    #[default]
    Start,
    /// Mid-round; more groups remain.
    Continue,
    /// Round finished and settled; next draw resets.
    Restart,
}

impl Affordance {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Continue => "Continue",
            Self::Restart => "Restart",
        }
    }
}
