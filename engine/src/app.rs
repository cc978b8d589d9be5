//! Application state shared between the frame loop, input handling and
//! rendering.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use starpick_types::ui::{UiOptions, ViewState};
use starpick_types::{GroupSize, Viewport};

use crate::roster::{Roster, RosterError};
use crate::scheduler::Timing;
use crate::session::{Session, SessionEvent};

/// Human label for the current grouping mode.
#[must_use]
pub fn mode_label(size: GroupSize) -> String {
    if size.is_individual() {
        "Individual".to_string()
    } else {
        format!("Groups of {size}")
    }
}

pub struct App {
    session: Session,
    rng: StdRng,
    view: ViewState,
    options: UiOptions,
    viewport: Viewport,
    roster_source: String,
    should_quit: bool,
}

impl App {
    /// Build the app around a loaded roster and announce it with a toast.
    pub fn new(
        roster: Roster,
        size: GroupSize,
        timing: Timing,
        options: UiOptions,
        now: Instant,
    ) -> Result<Self, RosterError> {
        Self::with_rng(roster, size, timing, options, now, StdRng::seed_from_u64(rand::random()))
    }

    /// Same as [`App::new`] with a caller-supplied generator, for reproducible
    /// runs.
    pub fn with_rng(
        roster: Roster,
        size: GroupSize,
        timing: Timing,
        options: UiOptions,
        now: Instant,
        mut rng: StdRng,
    ) -> Result<Self, RosterError> {
        let roster_source = roster.source().to_string();
        let count = roster.len();
        let session = Session::new(roster.into_entities(), size, &mut rng)?.with_timing(timing);

        let mut view = ViewState::default();
        view.show_toast(format!("Loaded {count} members from {roster_source}"), now);

        Ok(Self {
            session,
            rng,
            view,
            options,
            viewport: Viewport::default(),
            roster_source,
            should_quit: false,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn roster_source(&self) -> &str {
        &self.roster_source
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Trigger pressed. Returns nothing when the draw was ignored.
    ///
    /// An accepted draw closes the sidebar so the sky is unobstructed.
    pub fn request_draw(&mut self, now: Instant) -> Vec<SessionEvent> {
        let events = self.session.start_picking(now, self.viewport, &mut self.rng);
        if !events.is_empty() {
            self.view.sidebar_open = false;
        }
        events
    }

    pub fn cycle_mode(&mut self, now: Instant) {
        match self.session.switch_mode(&mut self.rng) {
            Ok(Some(size)) => self.view.flash_status(format!("Mode: {}", mode_label(size)), now),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("Mode switch failed: {err}");
                self.view.flash_status(err.to_string(), now);
            }
        }
    }

    pub fn reshuffle(&mut self, now: Instant) {
        match self.session.reshuffle(&mut self.rng) {
            Ok(true) => self.view.flash_status("Reshuffled", now),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!("Reshuffle failed: {err}");
                self.view.flash_status(err.to_string(), now);
            }
        }
    }

    /// Advance animations and expire transient UI.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        self.view.expire(now);
        self.session.tick(now, self.viewport)
    }

    pub fn toggle_sidebar(&mut self) {
        self.view.toggle_sidebar();
    }

    pub fn flash_status(&mut self, message: impl Into<String>, now: Instant) {
        self.view.flash_status(message, now);
    }

    #[must_use]
    pub fn export_text(&self) -> String {
        self.session.export_text()
    }
}

#[cfg(test)]
mod tests {
    use super::{App, mode_label};
    use crate::roster::Roster;
    use crate::scheduler::Timing;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use starpick_types::ui::UiOptions;
    use starpick_types::{GroupSize, Viewport};
    use std::time::Instant;

    fn app(now: Instant) -> App {
        let roster = Roster::from_text("Ada\nGrace\nAlan\n", "names.txt").unwrap();
        App::with_rng(
            roster,
            GroupSize::INDIVIDUAL,
            Timing::default(),
            UiOptions::default(),
            now,
            StdRng::seed_from_u64(1),
        )
        .unwrap()
    }

    #[test]
    fn new_app_announces_roster() {
        let now = Instant::now();
        let app = app(now);
        let toast = app.view().toast.as_ref().unwrap();
        assert_eq!(toast.message(), "Loaded 3 members from names.txt");
        assert_eq!(app.roster_source(), "names.txt");
    }

    #[test]
    fn mode_cycle_flashes_label() {
        let now = Instant::now();
        let mut app = app(now);
        app.cycle_mode(now);
        assert_eq!(app.session().group_size().get(), 2);
        assert_eq!(app.view().status.as_ref().unwrap().message(), "Mode: Groups of 2");
    }

    #[test]
    fn mode_switch_ignored_while_animating() {
        let now = Instant::now();
        let mut app = app(now);
        app.set_viewport(Viewport::new(100.0, 60.0));
        assert!(!app.request_draw(now).is_empty());
        app.cycle_mode(now);
        assert!(app.session().group_size().is_individual());
        assert!(app.view().status.is_none());
    }

    #[test]
    fn accepted_draw_closes_sidebar() {
        let now = Instant::now();
        let mut app = app(now);
        app.set_viewport(Viewport::new(100.0, 60.0));
        app.toggle_sidebar();
        assert!(!app.request_draw(now).is_empty());
        assert!(!app.view().sidebar_open);

        // Ignored while animating: the sidebar stays where the user put it.
        app.toggle_sidebar();
        assert!(app.request_draw(now).is_empty());
        assert!(app.view().sidebar_open);
    }

    #[test]
    fn mode_labels() {
        assert_eq!(mode_label(GroupSize::INDIVIDUAL), "Individual");
        assert_eq!(mode_label(GroupSize::new(4).unwrap()), "Groups of 4");
    }

    #[test]
    fn quit_is_sticky() {
        let mut app = app(Instant::now());
        assert!(!app.should_quit());
        app.request_quit();
        assert!(app.should_quit());
    }
}
