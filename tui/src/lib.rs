//! TUI rendering and input handling for Starpick.
//!
//! The sky is drawn straight into the frame buffer in virtual units: one unit
//! per column and two per row, so rockets move with a roughly square aspect.

mod effects;
mod input;
mod prompt;
mod scene;
mod theme;

use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use starpick_engine::{
    App, DrawStage, EffectRecord, HallOfFame, LayoutMetrics, Point, Session, SessionPhase,
    Viewport, mode_label,
};

pub use effects::{pulse_on, toast_rect};
pub use input::{InputPump, apply_event, handle_events};
pub use prompt::{PromptOutcome, RosterPrompt, draw_prompt};
pub use scene::{Activity, Meteor, NameParticle, Particle, Scene, Star};
pub use theme::{FIREWORK_COLORS, Glyphs, Palette, glyphs, palette, styles};

/// Vertical display units per terminal row.
pub const UNITS_PER_ROW: f32 = 2.0;
const SIDEBAR_WIDTH: u16 = 32;
/// Narrower terminals never show the sidebar.
const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 64;
const ROCKET_TRAIL_SAMPLES: u32 = 6;
const ROCKET_TRAIL_STEP: Duration = Duration::from_millis(40);
const METEOR_TRAIL_LEN: usize = 10;

struct Regions {
    stage: Rect,
    sidebar: Option<Rect>,
    status: Rect,
}

fn regions(area: Rect, sidebar_open: bool) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let (body, status) = (rows[0], rows[1]);

    if sidebar_open && area.width >= SIDEBAR_MIN_TERMINAL_WIDTH {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
            .split(body);
        Regions {
            stage: cols[0],
            sidebar: Some(cols[1]),
            status,
        }
    } else {
        Regions {
            stage: body,
            sidebar: None,
            status,
        }
    }
}

/// Sky size in display units for a terminal of `area`.
#[must_use]
pub fn stage_viewport(area: Rect, sidebar_open: bool) -> Viewport {
    let stage = regions(area, sidebar_open).stage;
    Viewport::new(f32::from(stage.width), f32::from(stage.height) * UNITS_PER_ROW)
}

/// One frame of simulation: resize, advance the session, feed the scene.
pub fn advance_frame(app: &mut App, scene: &mut Scene, area: Rect, now: Instant) {
    let viewport = stage_viewport(area, app.view().sidebar_open);
    app.set_viewport(viewport);
    scene.resize(viewport);

    let events = app.tick(now);
    let session = app.session();
    scene.apply_events(&events, session.roster(), now);

    let activity = if session.phase() == SessionPhase::Animating {
        Activity::Launching
    } else if session.scheduler().is_empty() {
        Activity::Quiet
    } else {
        Activity::Landing
    };
    scene.update(now, activity);
}

pub fn draw(frame: &mut Frame, app: &App, scene: &Scene, now: Instant) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let regions = regions(frame.area(), app.view().sidebar_open);

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg_sky)),
        frame.area(),
    );

    {
        let mut sky = Sky::new(frame.buffer_mut(), regions.stage);
        draw_stars(&mut sky, scene, &palette, &glyphs, now, options.reduced_motion);
        draw_name_particles(&mut sky, scene, &palette, now);
        draw_meteors(&mut sky, scene, &palette, &glyphs);
        draw_particles(&mut sky, scene, &palette, &glyphs);
        draw_hall_of_fame(&mut sky, app.session(), &palette);
        draw_records(&mut sky, app.session(), &palette, &glyphs, now, options.reduced_motion);
    }

    if let Some(sidebar) = regions.sidebar {
        draw_sidebar(frame, sidebar, app.session().hall(), &palette, &glyphs);
    }
    draw_status_bar(frame, regions.status, app, &palette, &glyphs, now);
    draw_toast(frame, regions.stage, app, &palette, now);
}

/// Maps display units onto terminal cells inside one region.
struct Sky<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl<'a> Sky<'a> {
    fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self { buf, area }
    }

    fn width(&self) -> f32 {
        f32::from(self.area.width)
    }

    fn row(&self, y: f32) -> Option<u16> {
        if !y.is_finite() || y < 0.0 {
            return None;
        }
        let row = (y / UNITS_PER_ROW).floor();
        (row < f32::from(self.area.height)).then(|| self.area.y + row as u16)
    }

    fn cell(&self, p: Point) -> Option<(u16, u16)> {
        if !p.x.is_finite() || p.x < 0.0 || p.x >= self.width() {
            return None;
        }
        let row = self.row(p.y)?;
        Some((self.area.x + p.x.floor() as u16, row))
    }

    fn put(&mut self, p: Point, symbol: &str, style: Style) {
        if let Some(pos) = self.cell(p)
            && let Some(cell) = self.buf.cell_mut(pos)
        {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    /// Text centered on `center`, nudged inward rather than clipped at the
    /// edges.
    fn text(&mut self, center: Point, text: &str, style: Style) {
        let Some(row) = self.row(center.y) else {
            return;
        };
        let width = text.width() as f32;
        let max_start = (self.width() - width).max(0.0);
        let start = (center.x - width / 2.0).round().clamp(0.0, max_start) as u16;
        let available = usize::from(self.area.width.saturating_sub(start));
        self.buf
            .set_stringn(self.area.x + start, row, text, available, style);
    }
}

fn draw_stars(
    sky: &mut Sky<'_>,
    scene: &Scene,
    palette: &Palette,
    glyphs: &Glyphs,
    now: Instant,
    reduced_motion: bool,
) {
    let t = scene.clock(now);
    for star in scene.stars() {
        let brightness = star.brightness(t, reduced_motion);
        let symbol = if brightness > 0.75 {
            glyphs.star_bright
        } else {
            glyphs.star_dim
        };
        let color = palette.fade(palette.star, brightness);
        sky.put(
            scene.star_position(star, reduced_motion),
            symbol,
            Style::default().fg(color),
        );
    }
}

fn draw_name_particles(sky: &mut Sky<'_>, scene: &Scene, palette: &Palette, now: Instant) {
    for particle in scene.name_particles() {
        let color = palette.fade(palette.name_particle, particle.alpha(now) * 0.6);
        sky.text(particle.pos, &particle.name, Style::default().fg(color));
    }
}

fn draw_meteors(sky: &mut Sky<'_>, scene: &Scene, palette: &Palette, glyphs: &Glyphs) {
    for meteor in scene.meteors() {
        let back = meteor.trail_direction();
        for i in (1..=METEOR_TRAIL_LEN).rev() {
            let distance = i as f32 * 1.5;
            let p = Point::new(meteor.pos.x + back.x * distance, meteor.pos.y + back.y * distance);
            let fade = meteor.alpha * (1.0 - i as f32 / (METEOR_TRAIL_LEN as f32 + 1.0));
            sky.put(
                p,
                glyphs.meteor_trail,
                Style::default().fg(palette.fade(palette.meteor_trail, fade)),
            );
        }
        sky.put(
            meteor.pos,
            glyphs.meteor_head,
            Style::default().fg(palette.fade(palette.meteor_head, meteor.alpha)),
        );
    }
}

fn draw_particles(sky: &mut Sky<'_>, scene: &Scene, palette: &Palette, glyphs: &Glyphs) {
    for particle in scene.particles() {
        let alpha = particle.alpha();
        let symbol = if alpha > 0.4 {
            glyphs.particle
        } else {
            glyphs.particle_fading
        };
        let color = palette.fade(palette.firework(particle.slot), alpha);
        sky.put(particle.pos, symbol, Style::default().fg(color));
    }
}

fn draw_hall_of_fame(sky: &mut Sky<'_>, session: &Session, palette: &Palette) {
    let layout: &LayoutMetrics = session.layout();
    let size = session.group_size();
    let width = sky.width();

    for entry in session.hall().entries() {
        let slot = layout.slot_position(entry.slot(), size).resolve(width);
        if size.is_individual() {
            for (_, member) in entry.arrivals() {
                sky.text(slot, member.name(), styles::hall_name(palette));
                if let Some(id) = member.id() {
                    let below = Point::new(slot.x, slot.y + layout.line_height);
                    sky.text(below, id, styles::hall_label(palette));
                }
            }
        } else {
            sky.text(
                slot,
                &format!("Group {}", entry.group().id()),
                styles::hall_label(palette),
            );
            for (index, member) in entry.arrivals() {
                let p = layout.member_position(entry.slot(), size, index, width);
                sky.text(p, &member.list_label(), styles::hall_name(palette));
            }
        }
    }
}

fn draw_records(
    sky: &mut Sky<'_>,
    session: &Session,
    palette: &Palette,
    glyphs: &Glyphs,
    now: Instant,
    reduced_motion: bool,
) {
    let timing = session.timing();
    let midpoint = f32::midpoint(timing.start_font, timing.end_font);

    for record in session.scheduler().records() {
        match record.stage() {
            DrawStage::Flight => draw_rocket(sky, record, palette, glyphs, now),
            DrawStage::Pause | DrawStage::Rise => {
                let Some(member) = record.member() else {
                    continue;
                };
                let mut style = Style::default()
                    .fg(palette.hall_name)
                    .add_modifier(Modifier::BOLD);
                if record.stage() == DrawStage::Pause {
                    let elapsed = now.saturating_duration_since(record.stage_started_at());
                    if !pulse_on(elapsed, reduced_motion) {
                        style = style.fg(palette.firework(record.group().slot()));
                    }
                }
                let label = if record.font_size(now) >= midpoint {
                    letter_spaced(member.name())
                } else {
                    member.name().to_string()
                };
                sky.text(record.position(now), &label, style);
            }
        }
    }
}

fn draw_rocket(
    sky: &mut Sky<'_>,
    record: &EffectRecord,
    palette: &Palette,
    glyphs: &Glyphs,
    now: Instant,
) {
    let color = palette.firework(record.group().slot());
    for step in (1..=ROCKET_TRAIL_SAMPLES).rev() {
        let Some(then) = now.checked_sub(ROCKET_TRAIL_STEP * step) else {
            continue;
        };
        if then < record.stage_started_at() {
            continue;
        }
        let fade = 1.0 - step as f32 / (ROCKET_TRAIL_SAMPLES as f32 + 1.0);
        sky.put(
            record.position(then),
            glyphs.rocket_trail,
            Style::default().fg(palette.fade(color, fade)),
        );
    }
    sky.put(
        record.position(now),
        glyphs.rocket_head,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );
}

fn letter_spaced(name: &str) -> String {
    let mut out = String::with_capacity(name.len() * 2);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn draw_sidebar(
    frame: &mut Frame,
    area: Rect,
    hall: &HallOfFame,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let settled = hall.settled();
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_panel))
        .title(format!(" Drawn ({}) ", settled.len()));
    let inner = block.inner(area);
    let visible = usize::from(inner.height);
    let skip = settled.len().saturating_sub(visible);

    let lines: Vec<Line> = settled
        .iter()
        .skip(skip)
        .map(|entity| {
            Line::from(vec![
                Span::styled(format!("{} ", glyphs.bullet), Style::default().fg(palette.accent)),
                Span::styled(entity.list_label(), Style::default().fg(palette.text_primary)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    palette: &Palette,
    glyphs: &Glyphs,
    now: Instant,
) {
    let session = app.session();
    let mut spans = Vec::new();

    match session.affordance() {
        Some(affordance) => {
            spans.push(Span::styled(" Space ", styles::key_highlight(palette)));
            spans.push(Span::styled(
                format!(" {} ", affordance.label()),
                styles::trigger_ready(palette),
            ));
        }
        None => {
            let busy = match session.phase() {
                SessionPhase::Settling => "Settling...",
                _ => "Drawing...",
            };
            spans.push(Span::styled(format!(" {busy} "), styles::trigger_disabled(palette)));
        }
    }

    let pool = session.pool();
    spans.push(Span::styled(format!(" {} ", glyphs.separator), styles::key_hint(palette)));
    spans.push(Span::styled(
        mode_label(session.group_size()),
        Style::default().fg(palette.text_primary),
    ));
    spans.push(Span::styled(
        format!("  {}/{} left", pool.remaining(), pool.total()),
        styles::key_hint(palette),
    ));
    spans.push(Span::styled(format!(" {} ", glyphs.separator), styles::key_hint(palette)));

    match app.view().status.as_ref().filter(|status| status.is_visible(now)) {
        Some(status) => spans.push(Span::styled(
            status.message().to_string(),
            styles::status_flash(palette),
        )),
        None => {
            for (key, action) in [
                ("m", "mode"),
                ("r", "reshuffle"),
                ("c", "copy"),
                ("s", "sidebar"),
                ("q", "quit"),
            ] {
                spans.push(Span::styled(key, styles::key_highlight(palette)));
                spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_panel)),
        area,
    );
}

fn draw_toast(frame: &mut Frame, stage: Rect, app: &App, palette: &Palette, now: Instant) {
    let Some(toast) = app.view().toast.as_ref().filter(|toast| toast.is_visible(now)) else {
        return;
    };
    let width = (toast.message().width() as u16)
        .saturating_add(4)
        .min(stage.width);
    let height = stage.height.min(3);
    if width == 0 || height == 0 {
        return;
    }
    let base = Rect {
        x: stage.x + stage.width.saturating_sub(width + 1),
        y: stage.y + stage.height.saturating_sub(height).min(1),
        width,
        height,
    };
    let rect = toast_rect(toast, base, stage, now, app.ui_options().reduced_motion);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg_panel));
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Span::styled(
            toast.message().to_string(),
            Style::default().fg(palette.text_primary),
        ))
        .block(block),
        rect,
    );
}
