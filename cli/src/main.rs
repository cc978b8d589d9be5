//! Starpick CLI - binary entry point and terminal session management.
//!
//! The CLI bridges [`starpick_engine`] (session state) and [`starpick_tui`]
//! (night-sky rendering), with RAII terminal management and guaranteed
//! cleanup.
//!
//! # Event Loop
//!
//! A fixed ~30 FPS cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`starpick_tui::InputPump`])
//! 3. Advance session and scene (`advance_frame`)
//! 4. Render frame
//!
//! When no roster can be loaded, a path prompt runs inside the same
//! terminal session until one loads or the user quits.

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::{Rect, Size};
use ratatui::prelude::{Backend, CrosstermBackend, Terminal};
use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use starpick_engine::ui::UiOptions;
use starpick_engine::{
    App, GroupSize, Roster, RosterError, StarpickConfig, Timing, resolve_roster_path,
};
use starpick_tui::{
    InputPump, PromptOutcome, RosterPrompt, Scene, advance_frame, draw, draw_prompt,
    handle_events, stage_viewport,
};

const FRAME_DURATION: Duration = Duration::from_millis(33);

const USAGE: &str = "\
Usage: starpick [ROSTER]

Draws names from ROSTER (one per line, optional id) with fireworks.
Without ROSTER, uses $STARPICK_ROSTER, then [roster] path in
~/.starpick/config.toml, then ./names.txt.

Keys: Space/Enter draw, m mode, r reshuffle, c copy, s sidebar, q quit";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than draw over the sky.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!("Failed to open log file {}: {e}", candidate.display()));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.starpick/logs/starpick.log
    if let Some(config_path) = StarpickConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("starpick.log"));
    }

    candidates.push(PathBuf::from(".starpick").join("logs").join("starpick.log"));
    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode and the alternate screen are restored on drop, so the terminal
/// stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, DisableBracketedPaste);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(mut terminal) => {
                let _ = terminal.hide_cursor();
                Ok(Self { terminal })
            }
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

fn load_roster(
    cli_arg: Option<&Path>,
    config: Option<&StarpickConfig>,
) -> Result<Roster, RosterError> {
    Roster::load(&resolve_roster_path(cli_arg, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let arg = env::args_os().nth(1).map(PathBuf::from);
    if arg
        .as_deref()
        .is_some_and(|a| a == Path::new("-h") || a == Path::new("--help"))
    {
        println!("{USAGE}");
        return Ok(());
    }

    init_tracing();

    let config = match StarpickConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Using default settings: {err}");
            None
        }
    };
    let loaded = load_roster(arg.as_deref(), config.as_ref());
    let size = config.as_ref().map(StarpickConfig::group_size).unwrap_or_default();
    let timing = config.as_ref().map(StarpickConfig::timing).unwrap_or_default();
    let options = config.as_ref().map(StarpickConfig::ui_options).unwrap_or_default();

    let result = {
        let mut session = TerminalSession::new()?;
        let mut input = InputPump::new();
        let result = start(&mut session.terminal, &mut input, loaded, size, timing, options).await;
        input.shutdown().await;
        result
    };

    if let Err(err) = &result {
        tracing::error!("Exited with error: {err:?}");
    }
    result
}

/// Run the prompt if the startup roster failed, then the draw loop.
async fn start<B>(
    terminal: &mut Terminal<B>,
    input: &mut InputPump,
    loaded: Result<Roster, RosterError>,
    size: GroupSize,
    timing: Timing,
    options: UiOptions,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let roster = match loaded {
        Ok(roster) => roster,
        Err(err) => {
            tracing::warn!("No roster at startup: {err}");
            let prompt = RosterPrompt::new(err.to_string());
            match prompt_for_roster(terminal, input, prompt, options).await? {
                Some(roster) => roster,
                None => return Ok(()),
            }
        }
    };

    let mut app = App::new(roster, size, timing, options, Instant::now())?;
    run_app(terminal, &mut app, input).await
}

/// Ask for a roster path until one loads. `None` means the user quit.
async fn prompt_for_roster<B>(
    terminal: &mut Terminal<B>,
    input: &mut InputPump,
    mut prompt: RosterPrompt,
    options: UiOptions,
) -> Result<Option<Roster>>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        for ev in input.drain()? {
            match prompt.apply_event(&ev) {
                PromptOutcome::Pending => {}
                PromptOutcome::Quit => return Ok(None),
                PromptOutcome::Submit(path) => {
                    if let Some(roster) = prompt.load(&path) {
                        return Ok(Some(roster));
                    }
                }
            }
        }

        terminal.draw(|frame| draw_prompt(frame, &prompt, options))?;
    }
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    input: &mut InputPump,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let area = full_area(terminal.size()?);
    let viewport = stage_viewport(area, app.view().sidebar_open);
    let mut scene = Scene::new(viewport, Instant::now());
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        if handle_events(app, &mut scene, input)? {
            return Ok(());
        }

        let now = Instant::now();
        let area = full_area(terminal.size()?);
        advance_frame(app, &mut scene, area, now);

        terminal.draw(|frame| draw(frame, app, &scene, now))?;
    }
}

fn full_area(size: Size) -> Rect {
    Rect::new(0, 0, size.width, size.height)
}
