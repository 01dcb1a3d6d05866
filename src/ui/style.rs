//! Styling for marks, selection, the cursor and toolbar buttons.
//!
//! Uses ANSI colors and modifiers so the terminal's own palette applies.

use ratatui::style::{Color, Modifier, Style};

use crate::editor::{MarkSet, MarkType};

pub const fn mark_modifier(mark: MarkType) -> Modifier {
    match mark {
        MarkType::Bold => Modifier::BOLD,
        MarkType::Italic => Modifier::ITALIC,
        MarkType::Underline => Modifier::UNDERLINED,
    }
}

/// Style for text carrying `marks`.
pub fn mark_style(marks: MarkSet) -> Style {
    marks
        .iter()
        .fold(Style::default(), |style, mark| {
            style.add_modifier(mark_modifier(mark))
        })
}

pub fn selection_style(base: Style) -> Style {
    base.bg(Color::Blue).fg(Color::White)
}

pub fn cursor_style(base: Style) -> Style {
    base.bg(Color::White).fg(Color::Black)
}

/// Toolbar button look: pressed (mark active), enabled, or disabled.
pub fn button_style(active: bool, enabled: bool) -> Style {
    if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if active {
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

pub fn status_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}
