//! # Theme System
//!
//! Provides the color palettes used by every widget of the dashboard.
//!
//! ## Overview
//!
//! The [`Theme`] struct names colors by semantic role (surfaces, ink levels,
//! luminous accents, status tones). Rendering code never hardcodes a
//! `ratatui::style::Color`; it asks the active theme. The theme can be cycled
//! at runtime with `t` and the choice is persisted in the user config.
//!
//! ## Built-in Themes
//!
//! - **Luminous** (default) - dark OLED surfaces with cyan/indigo accents
//! - **Catppuccin Mocha** - warm, dark pastel theme
//! - **Dracula** - dark theme with vivid colors
//! - **Nord** - arctic, north-bluish color palette
//! - **Tokyo Night** - dark theme inspired by Tokyo city lights

use ratatui::style::Color;

/// All colors used by the dashboard, grouped by semantic role.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Human-readable name, also the persisted key.
    pub name: &'static str,

    // -- Surfaces --
    /// Page background.
    pub bg: Color,
    /// Raised panel background (sidebar, header, modals).
    pub surface: Color,
    /// Card and divider borders.
    pub border: Color,

    // -- Ink --
    /// Primary text.
    pub fg: Color,
    /// Secondary text (captions, hints, inactive navigation).
    pub fg_dim: Color,

    // -- Accents --
    /// Primary accent (focused borders, active navigation, primary buttons).
    pub accent: Color,
    /// Secondary accent (charts, info highlights).
    pub indigo: Color,
    /// Tertiary accent (header tint).
    pub violet: Color,

    // -- Status tones --
    pub success: Color,
    pub warn: Color,
    pub danger: Color,

    /// Background of the selected navigation entry and focused form field.
    pub selection_bg: Color,
}

impl Theme {
    /// Return the list of all built-in themes (order = cycle order).
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Return the default theme (Luminous).
    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// The theme following this one in cycle order, wrapping around.
    pub fn next(&self) -> &'static Theme {
        let index = BUILT_IN_THEMES
            .iter()
            .position(|t| t.name == self.name)
            .map_or(0, |i| (i + 1) % BUILT_IN_THEMES.len());
        &BUILT_IN_THEMES[index]
    }
}

/// Blend `from` toward `to` by `t` (0..=1). Non-RGB colors switch at the midpoint.
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| -> u8 {
                (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

// ---------------------------------------------------------------------------
// Built-in theme definitions
// ---------------------------------------------------------------------------

static BUILT_IN_THEMES: [Theme; 5] = [
    // 0 - Luminous (default)
    Theme {
        name: "Luminous",
        bg: Color::Rgb(7, 11, 18),           // bg-900
        surface: Color::Rgb(14, 22, 38),     // bg-800
        border: Color::Rgb(32, 35, 42),      // white/10 over bg
        fg: Color::Rgb(235, 235, 236),       // ink-50
        fg_dim: Color::Rgb(121, 123, 127),   // ink-600
        accent: Color::Rgb(34, 211, 238),    // lum-cyan
        indigo: Color::Rgb(99, 102, 241),    // lum-indigo
        violet: Color::Rgb(167, 139, 250),   // lum-violet
        success: Color::Rgb(52, 211, 153),   // lum-green
        warn: Color::Rgb(251, 191, 36),      // lum-amber
        danger: Color::Rgb(251, 113, 133),   // lum-rose
        selection_bg: Color::Rgb(26, 36, 54),
    },
    // 1 - Catppuccin Mocha
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),           // base
        surface: Color::Rgb(49, 50, 68),      // surface0
        border: Color::Rgb(69, 71, 90),       // surface1
        fg: Color::Rgb(205, 214, 244),        // text
        fg_dim: Color::Rgb(108, 112, 134),    // overlay0
        accent: Color::Rgb(137, 220, 235),    // sky
        indigo: Color::Rgb(180, 190, 254),    // lavender
        violet: Color::Rgb(203, 166, 247),    // mauve
        success: Color::Rgb(166, 227, 161),   // green
        warn: Color::Rgb(249, 226, 175),      // yellow
        danger: Color::Rgb(243, 139, 168),    // red
        selection_bg: Color::Rgb(69, 71, 90), // surface1
    },
    // 2 - Dracula
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        surface: Color::Rgb(68, 71, 90),
        border: Color::Rgb(68, 71, 90),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(139, 233, 253), // cyan
        indigo: Color::Rgb(189, 147, 249), // purple
        violet: Color::Rgb(255, 121, 198), // pink
        success: Color::Rgb(80, 250, 123),
        warn: Color::Rgb(241, 250, 140),
        danger: Color::Rgb(255, 85, 85),
        selection_bg: Color::Rgb(68, 71, 90),
    },
    // 3 - Nord
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        surface: Color::Rgb(59, 66, 82),
        border: Color::Rgb(67, 76, 94),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(129, 140, 160),
        accent: Color::Rgb(136, 192, 208), // frost
        indigo: Color::Rgb(129, 161, 193),
        violet: Color::Rgb(180, 142, 173),
        success: Color::Rgb(163, 190, 140),
        warn: Color::Rgb(235, 203, 139),
        danger: Color::Rgb(191, 97, 106),
        selection_bg: Color::Rgb(67, 76, 94),
    },
    // 4 - Tokyo Night
    Theme {
        name: "Tokyo Night",
        bg: Color::Rgb(26, 27, 38),
        surface: Color::Rgb(36, 40, 59),
        border: Color::Rgb(41, 46, 66),
        fg: Color::Rgb(169, 177, 214),
        fg_dim: Color::Rgb(86, 95, 137),
        accent: Color::Rgb(125, 207, 255), // cyan
        indigo: Color::Rgb(122, 162, 247), // blue
        violet: Color::Rgb(187, 154, 247), // magenta
        success: Color::Rgb(158, 206, 106),
        warn: Color::Rgb(224, 175, 104),
        danger: Color::Rgb(247, 118, 142),
        selection_bg: Color::Rgb(41, 46, 66),
    },
];
