//! View state for rendering.
//!
//! This struct groups all state related to rendering and UI display,
//! separating it from the draw state machine.

use std::time::{Duration, Instant};

use super::animation::EffectTimer;

/// How long the roster-loaded toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(3500);
/// How long a status flash (e.g. "Copied!") replaces the key hints.
pub const STATUS_FLASH_DURATION: Duration = Duration::from_millis(2000);

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// A transient message that slides in, holds, and disappears.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    message: String,
    timer: EffectTimer,
}

impl Toast {
    #[must_use]
    pub fn new(message: impl Into<String>, now: Instant, duration: Duration) -> Self {
        Self {
            message: message.into(),
            timer: EffectTimer::new(now, duration),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn timer(&self) -> &EffectTimer {
        &self.timer
    }

    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        !self.timer.is_finished(now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub sidebar_open: bool,
    pub toast: Option<Toast>,
    pub status: Option<Toast>,
}

impl ViewState {
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast::new(message, now, TOAST_DURATION));
    }

    pub fn flash_status(&mut self, message: impl Into<String>, now: Instant) {
        self.status = Some(Toast::new(message, now, STATUS_FLASH_DURATION));
    }

    /// Drop expired toasts.
    pub fn expire(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| !t.is_visible(now)) {
            self.toast = None;
        }
        if self.status.as_ref().is_some_and(|t| !t.is_visible(now)) {
            self.status = None;
        }
    }
}
