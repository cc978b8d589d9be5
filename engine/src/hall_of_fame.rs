//! Hall of fame: members that finished their rise, keyed by reserved slot.

use std::collections::BTreeMap;
use std::sync::Arc;

use starpick_types::{DrawnGroup, Entity, GroupSize, SlotIndex};

/// One group's row on the board. Members arrive one at a time.
#[derive(Debug, Clone)]
pub struct HallEntry {
    group: Arc<DrawnGroup>,
    /// Member indices in arrival order.
    collected: Vec<usize>,
}

impl HallEntry {
    fn new(group: Arc<DrawnGroup>) -> Self {
        Self {
            group,
            collected: Vec::new(),
        }
    }

    #[must_use]
    pub fn group(&self) -> &DrawnGroup {
        &self.group
    }

    #[must_use]
    pub fn slot(&self) -> SlotIndex {
        self.group.slot()
    }

    pub fn collected(&self) -> impl Iterator<Item = &Entity> {
        self.arrivals().map(|(_, member)| member)
    }

    /// Collected members with their index in the group, in arrival order.
    pub fn arrivals(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.collected
            .iter()
            .filter_map(|&index| self.group.member(index).map(|member| (index, member)))
    }

    #[must_use]
    pub fn has_member(&self, member_index: usize) -> bool {
        self.collected.contains(&member_index)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.collected.len() == self.group.members().len()
    }
}

/// Result of appending a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Member added; the group still has members in the air.
    Partial,
    /// Member added and the group is now complete.
    Completed,
    /// Member was already recorded.
    Duplicate,
}

#[derive(Debug, Clone, Default)]
pub struct HallOfFame {
    entries: BTreeMap<SlotIndex, HallEntry>,
    /// Every settled member in arrival order, across groups.
    settled: Vec<Entity>,
}

impl HallOfFame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member to its group's entry, creating the entry on first
    /// arrival.
    pub fn record(&mut self, group: &Arc<DrawnGroup>, member_index: usize) -> Arrival {
        let entry = self
            .entries
            .entry(group.slot())
            .or_insert_with(|| HallEntry::new(Arc::clone(group)));

        if entry.has_member(member_index) || member_index >= entry.group.members().len() {
            return Arrival::Duplicate;
        }
        entry.collected.push(member_index);
        if let Some(member) = entry.group.member(member_index) {
            self.settled.push(member.clone());
        }

        if entry.is_complete() {
            Arrival::Completed
        } else {
            Arrival::Partial
        }
    }

    /// Entries in slot order, complete or not.
    pub fn entries(&self) -> impl Iterator<Item = &HallEntry> {
        self.entries.values()
    }

    pub fn complete_entries(&self) -> impl Iterator<Item = &HallEntry> {
        self.entries.values().filter(|entry| entry.is_complete())
    }

    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&HallEntry> {
        self.entries.get(&slot)
    }

    #[must_use]
    pub fn settled(&self) -> &[Entity] {
        &self.settled
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.settled.clear();
    }

    /// Plain-text dump of complete entries in slot order.
    ///
    /// One `name<TAB>id` line per member. In group mode each group gets a
    /// `--- Group N ---` header and a trailing blank line.
    #[must_use]
    pub fn export_text(&self, size: GroupSize) -> String {
        let mut out = String::new();
        for entry in self.complete_entries() {
            if !size.is_individual() {
                out.push_str(&format!("--- Group {} ---\n", entry.group.id()));
            }
            for member in entry.collected() {
                out.push_str(&member.export_line());
                out.push('\n');
            }
            if !size.is_individual() {
                out.push('\n');
            }
        }
        out
    }
}
