//! Tricolor palette and semantic styling for the form.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const TRICOLOR_RED: Color = Color::Rgb(200, 16, 46); // #c8102e
pub const OFF_WHITE: Color = Color::Rgb(230, 230, 230); // #e6e6e6
pub const DIM_GRAY: Color = Color::Rgb(130, 130, 140); // #82828c
pub const BORDER_GRAY: Color = Color::Rgb(90, 96, 110); // #5a606e
pub const GOLD: Color = Color::Rgb(234, 179, 8); // #eab308

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for the header.
pub fn title_style() -> Style {
    Style::default()
        .fg(TRICOLOR_RED)
        .add_modifier(Modifier::BOLD)
}

/// Border for the focused control.
pub fn border_focused() -> Style {
    Style::default().fg(TRICOLOR_RED)
}

/// Border for unfocused controls.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Normal value text.
pub fn value_style() -> Style {
    Style::default().fg(OFF_WHITE)
}

/// Footer hints and placeholders.
pub fn hint_style() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// The focused checkbox row / submit control.
pub fn selected_style() -> Style {
    Style::default()
        .fg(TRICOLOR_RED)
        .add_modifier(Modifier::BOLD)
}

/// The submit control while a submission is outstanding.
pub fn busy_style() -> Style {
    Style::default().fg(GOLD)
}
