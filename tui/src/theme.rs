//! Color theme and glyphs for the Starpick TUI.
//!
//! A night-sky palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use starpick_types::SlotIndex;
use starpick_types::ui::UiOptions;

/// Night-sky color constants.
mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_SKY: Color = Color::Rgb(8, 10, 24);
    pub const BG_PANEL: Color = Color::Rgb(18, 20, 38);
    pub const BG_BORDER: Color = Color::Rgb(70, 74, 110);

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(235, 235, 245);
    pub const TEXT_MUTED: Color = Color::Rgb(120, 124, 150);
    pub const TEXT_DISABLED: Color = Color::Rgb(70, 72, 90);

    // === Accents ===
    pub const STAR: Color = Color::Rgb(255, 255, 255);
    pub const NAME_PARTICLE: Color = Color::Rgb(200, 220, 255);
    pub const METEOR_HEAD: Color = Color::Rgb(170, 220, 255);
    pub const METEOR_TRAIL: Color = Color::Rgb(100, 150, 255);
    pub const GOLD: Color = Color::Rgb(255, 215, 120);
    pub const PEACH: Color = Color::Rgb(255, 160, 102);
    pub const GREEN: Color = Color::Rgb(152, 187, 108);
}

/// Rocket and burst colors, assigned per slot.
pub const FIREWORK_COLORS: [Color; 9] = [
    Color::Rgb(255, 100, 100),
    Color::Rgb(100, 255, 100),
    Color::Rgb(100, 100, 255),
    Color::Rgb(255, 165, 0),
    Color::Rgb(255, 255, 0),
    Color::Rgb(138, 43, 226),
    Color::Rgb(255, 150, 255),
    Color::Rgb(150, 255, 255),
    Color::Rgb(245, 245, 245),
];

const FIREWORK_COLORS_HIGH_CONTRAST: [Color; 9] = [
    Color::LightRed,
    Color::LightGreen,
    Color::LightBlue,
    Color::Yellow,
    Color::LightYellow,
    Color::LightMagenta,
    Color::Magenta,
    Color::LightCyan,
    Color::White,
];

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_sky: Color,
    pub bg_panel: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub star: Color,
    pub name_particle: Color,
    pub meteor_head: Color,
    pub meteor_trail: Color,
    pub hall_name: Color,
    pub hall_label: Color,
    pub accent: Color,
    pub success: Color,
    fireworks: [Color; 9],
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_sky: colors::BG_SKY,
            bg_panel: colors::BG_PANEL,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_muted: colors::TEXT_MUTED,
            text_disabled: colors::TEXT_DISABLED,
            star: colors::STAR,
            name_particle: colors::NAME_PARTICLE,
            meteor_head: colors::METEOR_HEAD,
            meteor_trail: colors::METEOR_TRAIL,
            hall_name: colors::GOLD,
            hall_label: colors::TEXT_MUTED,
            accent: colors::PEACH,
            success: colors::GREEN,
            fireworks: FIREWORK_COLORS,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_sky: Color::Black,
            bg_panel: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_muted: Color::Gray,
            text_disabled: Color::DarkGray,
            star: Color::White,
            name_particle: Color::Gray,
            meteor_head: Color::White,
            meteor_trail: Color::Gray,
            hall_name: Color::Yellow,
            hall_label: Color::White,
            accent: Color::Yellow,
            success: Color::Green,
            fireworks: FIREWORK_COLORS_HIGH_CONTRAST,
        }
    }

    /// Color for everything launched into `slot`.
    #[must_use]
    pub fn firework(&self, slot: SlotIndex) -> Color {
        self.fireworks[slot.value() % self.fireworks.len()]
    }

    /// Blend `color` toward the sky by `alpha` (1.0 = full color).
    ///
    /// Named colors have no channels to blend; they drop to `text_disabled`
    /// below half opacity.
    #[must_use]
    pub fn fade(&self, color: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        match (color, self.bg_sky) {
            (Color::Rgb(r, g, b), Color::Rgb(sky_r, sky_g, sky_b)) => {
                let mix = |fg: u8, sky: u8| -> u8 {
                    (f32::from(sky) + (f32::from(fg) - f32::from(sky)) * alpha).round() as u8
                };
                Color::Rgb(mix(r, sky_r), mix(g, sky_g), mix(b, sky_b))
            }
            _ if alpha < 0.5 => self.text_disabled,
            _ => color,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for sky objects.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub star_dim: &'static str,
    pub star_bright: &'static str,
    pub rocket_head: &'static str,
    pub rocket_trail: &'static str,
    pub particle: &'static str,
    pub particle_fading: &'static str,
    pub meteor_head: &'static str,
    pub meteor_trail: &'static str,
    pub separator: &'static str,
    pub bullet: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            star_dim: ".",
            star_bright: "*",
            rocket_head: "^",
            rocket_trail: ".",
            particle: "*",
            particle_fading: ".",
            meteor_head: "o",
            meteor_trail: "-",
            separator: "|",
            bullet: "*",
        }
    } else {
        Glyphs {
            star_dim: "·",
            star_bright: "✦",
            rocket_head: "●",
            rocket_trail: "•",
            particle: "✸",
            particle_fading: "·",
            meteor_head: "◉",
            meteor_trail: "─",
            separator: "│",
            bullet: "•",
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn trigger_ready(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_sky)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn trigger_disabled(palette: &Palette) -> Style {
        Style::default().fg(palette.text_disabled)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn status_flash(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.success)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn hall_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.hall_name)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn hall_label(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.hall_label)
            .add_modifier(Modifier::ITALIC)
    }
}
