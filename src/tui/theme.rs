//! Centralized Slate & Amber color theme for the Grimoire TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Amber — primary accent, initiative badges, focused borders.
pub const PRIMARY: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
/// Light amber — highlights, the active turn.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xFB, 0xBF, 0x24);
/// Dark amber — subtle emphasis, pressed states.
pub const PRIMARY_DARK: Color = Color::Rgb(0xB4, 0x53, 0x09);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Crimson — combat actions, start/end controls.
pub const ACCENT: Color = Color::Rgb(0xDC, 0x26, 0x26);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Near-black slate — base background.
pub const BG_BASE: Color = Color::Rgb(0x02, 0x06, 0x17);
/// Slate surface — elevated panels, modals.
pub const BG_SURFACE: Color = Color::Rgb(0x0F, 0x17, 0x2A);

// ── Text ────────────────────────────────────────────────────────────────────

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xF1, 0xF5, 0xF9);
/// Muted text — secondary labels.
pub const TEXT_MUTED: Color = Color::Rgb(0x94, 0xA3, 0xB8);
/// Dim text — disabled items, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x47, 0x55, 0x69);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Error — failures, fumbles, damage.
pub const ERROR: Color = Color::Rgb(0xEF, 0x44, 0x44);
/// Success — healing, criticals.
pub const SUCCESS: Color = Color::Rgb(0x22, 0xC5, 0x5E);
/// Warning — degraded HP, alerts.
pub const WARNING: Color = Color::Rgb(0xEA, 0xB3, 0x08);
/// Info — short-rest accents, player markers.
pub const INFO: Color = Color::Rgb(0x3B, 0x82, 0xF6);

// ── Domain ──────────────────────────────────────────────────────────────────

/// Status-effect badges — violet.
pub const STATUS: Color = Color::Rgb(0xA7, 0x8B, 0xFA);
/// HP bar above half.
pub const HP_HIGH: Color = Color::Rgb(0x16, 0xA3, 0x4A);
/// HP bar between a quarter and half.
pub const HP_MID: Color = Color::Rgb(0xCA, 0x8A, 0x04);
/// HP bar below a quarter.
pub const HP_LOW: Color = Color::Rgb(0xDC, 0x26, 0x26);

/// HP bar color for a current/max pair.
pub fn hp_color(fraction: f64) -> Color {
    if fraction > 0.5 {
        HP_HIGH
    } else if fraction > 0.25 {
        HP_MID
    } else {
        HP_LOW
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Amber bold text (titles, the active combatant).
pub fn title() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Dim text for disabled/faint items.
pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT)
}

/// Focused border style.
pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Unfocused border style.
pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
