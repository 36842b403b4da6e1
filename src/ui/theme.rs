//! Color theme for cinefetch
//!
//! Deep navy background, lavender labels, violet accent.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #030014 (near-black navy)
    pub const BACKGROUND: Color = Color::Rgb(0x03, 0x00, 0x14);

    /// Panel: #221f3d (rating badge, footer)
    pub const PANEL: Color = Color::Rgb(0x22, 0x1f, 0x3d);

    /// Accent: #ab8bff (violet, the "go back" button)
    pub const ACCENT: Color = Color::Rgb(0xab, 0x8b, 0xff);

    /// Value text: #d6c7ff
    pub const LIGHT_100: Color = Color::Rgb(0xd6, 0xc7, 0xff);

    /// Label text: #a8b5db
    pub const LIGHT_200: Color = Color::Rgb(0xa8, 0xb5, 0xdb);

    /// Title text: #ffffff
    pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Star: #ffd700
    pub const STAR: Color = Color::Rgb(0xff, 0xd7, 0x00);

    /// Error: #ff5c7a
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x7a);

    /// Border: #3a3566
    pub const BORDER: Color = Color::Rgb(0x3a, 0x35, 0x66);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::LIGHT_100).bg(Self::BACKGROUND)
    }

    /// Movie title
    pub fn title() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    /// Field label ("Overview", "Genres", ...)
    pub fn label() -> Style {
        Style::default().fg(Self::LIGHT_200)
    }

    /// Field value
    pub fn value() -> Style {
        Style::default()
            .fg(Self::LIGHT_100)
            .add_modifier(Modifier::BOLD)
    }

    /// Year and runtime line
    pub fn meta() -> Style {
        Style::default().fg(Self::LIGHT_200)
    }

    /// Rating badge
    pub fn rating() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::PANEL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn star() -> Style {
        Style::default().fg(Self::STAR).bg(Self::PANEL)
    }

    /// Poster link
    pub fn link() -> Style {
        Style::default()
            .fg(Self::LIGHT_200)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Error message
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Panel border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// The "go back" button
    pub fn button() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Keybinding description style
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::LIGHT_200)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance of an sRGB color
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between two colors, from 1 (identical) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for normal text (4.5:1)
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// RGB tuple of a `Color::Rgb`
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
