//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;
mod view_state;

pub use animation::{EffectTimer, ease_in_out_quad, ease_out_cubic, lerp};
pub use view_state::{STATUS_FLASH_DURATION, TOAST_DURATION, Toast, UiOptions, ViewState};
