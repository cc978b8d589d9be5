//! Hall-of-fame board layout.
//!
//! Slot positions fan out from screen center: index 0 at center, then
//! alternating left/right at growing offsets. X is stored as a percentage of
//! screen width and Y in absolute units, so existing rows do not reflow on
//! resize.

use starpick_types::{GroupSize, Point, SlotIndex};

/// Position of a slot, independent of the current screen width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPosition {
    pub x_percent: f32,
    pub y: f32,
}

impl SlotPosition {
    #[must_use]
    pub fn resolve(self, screen_width: f32) -> Point {
        Point::new(screen_width * self.x_percent / 100.0, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub top_margin: f32,
    pub base_offset_percent: f32,
    pub individual_per_row: usize,
    pub group_per_row: usize,
    /// Row pitch in individual mode (name line, id line, gap).
    pub individual_row_spacing: f32,
    /// Height of one text line; group rows are `label + members + gap` lines.
    pub line_height: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            top_margin: 2.0,
            base_offset_percent: 10.0,
            individual_per_row: 7,
            group_per_row: 9,
            individual_row_spacing: 6.0,
            line_height: 2.0,
        }
    }
}

impl LayoutMetrics {
    #[must_use]
    pub fn per_row(&self, size: GroupSize) -> usize {
        let per_row = if size.is_individual() {
            self.individual_per_row
        } else {
            self.group_per_row
        };
        per_row.max(1)
    }

    #[must_use]
    pub fn row_spacing(&self, size: GroupSize) -> f32 {
        if size.is_individual() {
            self.individual_row_spacing
        } else {
            (size.get() + 2) as f32 * self.line_height
        }
    }

    #[must_use]
    pub fn slot_position(&self, slot: SlotIndex, size: GroupSize) -> SlotPosition {
        let per_row = self.per_row(size);
        let row = slot.value() / per_row;
        let index_in_row = slot.value() % per_row;

        let y = self.top_margin + row as f32 * self.row_spacing(size);

        let magnitude = index_in_row.div_ceil(2) as f32 * self.base_offset_percent;
        let offset = if index_in_row % 2 == 1 { -magnitude } else { magnitude };

        SlotPosition {
            x_percent: 50.0 + offset,
            y,
        }
    }

    /// Where member `member_index` of the group in `slot` comes to rest.
    ///
    /// Individual mode places the single member on the slot itself; group mode
    /// reserves the slot line for the group label and stacks members below it.
    #[must_use]
    pub fn member_position(
        &self,
        slot: SlotIndex,
        size: GroupSize,
        member_index: usize,
        screen_width: f32,
    ) -> Point {
        let base = self.slot_position(slot, size).resolve(screen_width);
        if size.is_individual() {
            base
        } else {
            Point::new(base.x, base.y + (member_index + 1) as f32 * self.line_height)
        }
    }
}

/// Slot position with the default metrics, resolved against `screen_width`.
#[must_use]
pub fn slot_position(slot: SlotIndex, size: GroupSize, screen_width: f32) -> Point {
    LayoutMetrics::default()
        .slot_position(slot, size)
        .resolve(screen_width)
}
