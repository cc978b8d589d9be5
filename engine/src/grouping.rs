//! Grouping engine and the undrawn-group pool.

use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};

use starpick_types::{Entity, Group, GroupId, GroupSize};

use crate::roster::RosterError;

/// Shuffle `roster` and cut it into consecutive groups of `size`.
///
/// The last group may be short; it is never dropped. In individual mode the
/// group id is the entity's 0-based shuffled index, otherwise ids count from 1.
pub fn create_groups<R>(
    roster: &[Entity],
    size: GroupSize,
    rng: &mut R,
) -> Result<GroupPool, RosterError>
where
    R: Rng + ?Sized,
{
    if roster.is_empty() {
        return Err(RosterError::Empty);
    }

    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);

    let all: Vec<Group> = if size.is_individual() {
        shuffled
            .into_iter()
            .enumerate()
            .map(|(index, entity)| Group::new(GroupId::new(index as u32), vec![entity]))
            .collect()
    } else {
        shuffled
            .chunks(size.get())
            .enumerate()
            .map(|(index, chunk)| Group::new(GroupId::new(index as u32 + 1), chunk.to_vec()))
            .collect()
    };

    tracing::debug!(groups = all.len(), size = %size, "Roster partitioned");
    Ok(GroupPool::new(all))
}

/// The full partition for a round plus the groups not yet drawn.
#[derive(Debug, Clone)]
pub struct GroupPool {
    all: Vec<Group>,
    available: Vec<Group>,
}

impl GroupPool {
    fn new(all: Vec<Group>) -> Self {
        let available = all.clone();
        Self { all, available }
    }

    /// Remove a uniformly chosen group. Order of `available` is not preserved.
    pub fn draw<R>(&mut self, rng: &mut R) -> Option<Group>
    where
        R: Rng + ?Sized,
    {
        let index = (0..self.available.len()).choose(rng)?;
        Some(self.available.swap_remove(index))
    }

    /// Start a new round with the same partition.
    pub fn refill(&mut self) {
        self.available.clone_from(&self.all);
    }

    #[must_use]
    pub fn all(&self) -> &[Group] {
        &self.all
    }

    #[must_use]
    pub fn available(&self) -> &[Group] {
        &self.available
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.available.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.all.len()
    }
}
