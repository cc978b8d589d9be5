//! Input handling for the Starpick TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use starpick_engine::App;

use crate::scene::Scene;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    /// Spawn the blocking reader. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Next queued event, or `None` when the queue is empty.
    pub fn try_next(&mut self) -> Result<Option<Event>> {
        match self.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => Ok(Some(ev)),
            Ok(InputMsg::Error(msg)) => Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(anyhow!("input pump disconnected"))
            }
        }
    }

    /// Up to one frame's worth of queued events.
    pub fn drain(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while events.len() < MAX_EVENTS_PER_FRAME {
            match self.try_next()? {
                Some(ev) => events.push(ev),
                None => break,
            }
        }
        Ok(events)
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input. Returns `Ok(true)` once the app should quit.
pub fn handle_events(app: &mut App, scene: &mut Scene, input: &mut InputPump) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let Some(ev) = input.try_next()? else {
            break;
        };
        if apply_event(app, scene, &ev, Instant::now()) {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` if the app should quit.
pub fn apply_event(app: &mut App, scene: &mut Scene, ev: &Event, now: Instant) -> bool {
    if let Event::Key(key) = ev
        && key.kind == KeyEventKind::Press
    {
        handle_key(app, scene, *key, now);
    }
    app.should_quit()
}

fn handle_key(app: &mut App, scene: &mut Scene, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if matches!(key.code, KeyCode::Char('c')) {
            app.request_quit();
        }
        return;
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => trigger(app, scene, now),
        KeyCode::Char('m') => app.cycle_mode(now),
        KeyCode::Char('r') => app.reshuffle(now),
        KeyCode::Char('c') => copy_export(app, now),
        KeyCode::Char('s') => app.toggle_sidebar(),
        KeyCode::Char('q') | KeyCode::Esc => app.request_quit(),
        _ => {}
    }
}

/// Every press gets a meteor, even when the draw itself is ignored.
fn trigger(app: &mut App, scene: &mut Scene, now: Instant) {
    if !app.ui_options().reduced_motion {
        scene.spawn_meteor();
    }
    let events = app.request_draw(now);
    if events.is_empty() {
        debug!("Trigger pressed while busy");
        return;
    }
    scene.apply_events(&events, app.session().roster(), now);
}

fn copy_export(app: &mut App, now: Instant) {
    let text = app.export_text();
    if text.is_empty() {
        app.flash_status("Nothing to copy yet", now);
        return;
    }

    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => app.flash_status("Copied!", now),
        Err(err) => {
            warn!("Clipboard copy failed: {err}");
            app.flash_status(format!("Copy failed: {err}"), now);
        }
    }
}
