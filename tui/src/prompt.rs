//! Roster path prompt, shown when no roster could be loaded at startup.

use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use starpick_engine::ui::UiOptions;
use starpick_engine::{Roster, expand_path};

use crate::theme::{palette, styles};

const PROMPT_WIDTH: u16 = 64;
const PROMPT_HEIGHT: u16 = 12;

/// What the prompt wants after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    /// Load this path (already `~` and `${VAR}` expanded).
    Submit(PathBuf),
    Quit,
}

/// Line editor for a roster path plus the last load error.
#[derive(Debug, Clone, Default)]
pub struct RosterPrompt {
    input: String,
    error: String,
}

impl RosterPrompt {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            input: String::new(),
            error: error.into(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Apply one terminal event to the line editor.
    pub fn apply_event(&mut self, ev: &Event) -> PromptOutcome {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Paste(text) => {
                self.input.extend(text.chars().filter(|c| !c.is_control()));
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => PromptOutcome::Quit,
                KeyCode::Char('u') => {
                    self.input.clear();
                    PromptOutcome::Pending
                }
                _ => PromptOutcome::Pending,
            };
        }

        match key.code {
            KeyCode::Esc => PromptOutcome::Quit,
            KeyCode::Enter => {
                let path = self.input.trim();
                if path.is_empty() {
                    self.error = "Enter the path of a roster file".to_string();
                    PromptOutcome::Pending
                } else {
                    PromptOutcome::Submit(expand_path(path))
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    /// Load `path`. On failure the error replaces the message and the input
    /// stays for editing.
    pub fn load(&mut self, path: &Path) -> Option<Roster> {
        match Roster::load(path) {
            Ok(roster) => Some(roster),
            Err(err) => {
                warn!("Roster prompt: {err}");
                self.error = err.to_string();
                None
            }
        }
    }
}

pub fn draw_prompt(frame: &mut Frame, prompt: &RosterPrompt, options: UiOptions) {
    let palette = palette(options);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg_sky)),
        frame.area(),
    );

    let [row] = Layout::vertical([Constraint::Length(PROMPT_HEIGHT)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(PROMPT_WIDTH)])
        .flex(Flex::Center)
        .areas(row);

    let border_type = if options.ascii_only {
        BorderType::Plain
    } else {
        BorderType::Rounded
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg_panel))
        .title(" Choose a roster ");
    let inner = block.inner(area);

    // The error goes last so a long message wraps without moving the input.
    let lines = vec![
        Line::from(Span::styled(
            "One name per line, optionally with an id.",
            Style::default().fg(palette.text_primary),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("> ", styles::key_highlight(&palette)),
            Span::styled(
                prompt.input().to_string(),
                Style::default().fg(palette.text_primary),
            ),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight(&palette)),
            Span::styled(" load  ", styles::key_hint(&palette)),
            Span::styled("Esc", styles::key_highlight(&palette)),
            Span::styled(" quit", styles::key_hint(&palette)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            prompt.error().to_string(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );

    // Input sits on the third line, after the "> " marker.
    let input_width = u16::try_from(prompt.input().width()).unwrap_or(u16::MAX);
    let cursor_x = inner
        .x
        .saturating_add(2)
        .saturating_add(input_width)
        .min(inner.right().saturating_sub(1));
    let cursor_y = inner.y.saturating_add(2);
    if cursor_y < inner.bottom() {
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

#[cfg(test)]
mod tests {
    use super::{PromptOutcome, RosterPrompt};
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(prompt: &mut RosterPrompt, text: &str) {
        for c in text.chars() {
            assert_eq!(
                prompt.apply_event(&press(KeyCode::Char(c))),
                PromptOutcome::Pending
            );
        }
    }

    #[test]
    fn typing_then_enter_submits_path() {
        let mut prompt = RosterPrompt::new("no valid entities parsed");
        type_text(&mut prompt, "class.txx");
        prompt.apply_event(&press(KeyCode::Backspace));
        type_text(&mut prompt, "t");
        assert_eq!(prompt.input(), "class.txt");

        assert_eq!(
            prompt.apply_event(&press(KeyCode::Enter)),
            PromptOutcome::Submit(PathBuf::from("class.txt"))
        );
    }

    #[test]
    fn empty_submit_stays_and_explains() {
        let mut prompt = RosterPrompt::new("missing");
        type_text(&mut prompt, "   ");
        assert_eq!(
            prompt.apply_event(&press(KeyCode::Enter)),
            PromptOutcome::Pending
        );
        assert_eq!(prompt.error(), "Enter the path of a roster file");
    }

    #[test]
    fn paste_appends_without_newlines() {
        let mut prompt = RosterPrompt::default();
        prompt.apply_event(&Event::Paste("/srv/names.txt\n".to_string()));
        assert_eq!(prompt.input(), "/srv/names.txt");
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut prompt = RosterPrompt::default();
        assert_eq!(prompt.apply_event(&press(KeyCode::Esc)), PromptOutcome::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(prompt.apply_event(&ctrl_c), PromptOutcome::Quit);
    }

    #[test]
    fn ctrl_u_clears_and_release_is_ignored() {
        let mut prompt = RosterPrompt::default();
        type_text(&mut prompt, "abc");
        let mut release = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        prompt.apply_event(&Event::Key(release));
        assert_eq!(prompt.input(), "abc");

        let ctrl_u = Event::Key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        prompt.apply_event(&ctrl_u);
        assert_eq!(prompt.input(), "");
    }

    #[test]
    fn failed_load_reports_and_keeps_input() {
        let dir = tempdir().unwrap();
        let blank = dir.path().join("blank.txt");
        fs::write(&blank, "\n  \n").unwrap();

        let mut prompt = RosterPrompt::new("failed to read roster names.txt");
        type_text(&mut prompt, "blank.txt");
        assert!(prompt.load(&blank).is_none());
        assert_eq!(prompt.error(), "no valid entities parsed");
        assert_eq!(prompt.input(), "blank.txt");

        assert!(prompt.load(&dir.path().join("absent.txt")).is_none());
        assert!(prompt.error().starts_with("failed to read roster"));
    }

    #[test]
    fn retry_until_a_roster_loads() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("names.txt");
        fs::write(&good, "Ada\nGrace 1906\n").unwrap();

        let mut prompt = RosterPrompt::new("failed to read roster names.txt");
        assert!(prompt.load(&dir.path().join("nope.txt")).is_none());

        type_text(&mut prompt, &good.display().to_string());
        let PromptOutcome::Submit(path) = prompt.apply_event(&press(KeyCode::Enter)) else {
            panic!("expected a submitted path");
        };
        let roster = prompt.load(&path).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.source(), "names.txt");
    }
}
