//! Motion effects for TUI overlays.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use starpick_types::ui::{Toast, ease_out_cubic};

/// How long the toast takes to slide into place.
pub const TOAST_SLIDE: Duration = Duration::from_millis(300);

/// Slide the toast up from below its resting rect.
#[must_use]
pub fn toast_rect(
    toast: &Toast,
    base: Rect,
    viewport: Rect,
    now: Instant,
    reduced_motion: bool,
) -> Rect {
    if reduced_motion {
        return base;
    }
    let elapsed = toast.timer().elapsed(now);
    let t = ease_out_cubic(elapsed.as_secs_f32() / TOAST_SLIDE.as_secs_f32());
    slide_up(base, viewport, t)
}

fn slide_up(base: Rect, viewport: Rect, t: f32) -> Rect {
    let viewport_bottom = viewport.y.saturating_add(viewport.height);
    let base_bottom = base.y.saturating_add(base.height);
    let max_offset = viewport_bottom.saturating_sub(base_bottom);
    let offset = max_offset.min(base.height.saturating_div(2)).min(6);
    let y_offset = ((1.0 - t) * f32::from(offset)).round() as u16;
    Rect {
        y: base.y.saturating_add(y_offset),
        ..base
    }
}

/// Whether a pausing name is in the bright half of its pulse.
#[must_use]
pub fn pulse_on(elapsed: Duration, reduced_motion: bool) -> bool {
    const PERIOD_MS: u128 = 500;
    reduced_motion || (elapsed.as_millis() / PERIOD_MS) % 2 == 0
}
