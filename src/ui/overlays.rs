use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::toolbar::ToolbarButton;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Formatting", section_style));
    lines.push(Line::raw("  Ctrl-b              Bold"));
    lines.push(Line::raw("  Ctrl-i              Italic"));
    lines.push(Line::raw("  Ctrl-u              Underline"));
    lines.push(Line::raw("  Click B / I / U     Toggle from the toolbar"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("History", section_style));
    lines.push(Line::raw("  Ctrl-z              Undo"));
    lines.push(Line::raw("  Ctrl-y / Ctrl-Shift-z  Redo"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Toolbar", section_style));
    for button in ToolbarButton::ALL {
        let label = format!("[{}]", button.label());
        lines.push(Line::raw(format!("  {label:<20}{}", button.title())));
    }
    lines.push(Line::raw(""));

    lines.push(Line::styled("Editing", section_style));
    lines.push(Line::raw("  Arrows, Home/End    Move (Shift extends)"));
    lines.push(Line::raw("  Ctrl+Home/End       Document start / end"));
    lines.push(Line::raw("  Ctrl-a              Select all"));
    lines.push(Line::raw("  Enter               New paragraph"));
    lines.push(Line::raw("  Mouse click / drag  Place cursor / select"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Other", section_style));
    lines.push(Line::raw("  F1                  Toggle help"));
    lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    if popup.height <= 4 || popup.width <= 4 {
        return;
    }

    // Border and padding on each side.
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = lines
        .into_iter()
        .take(usize::from(content_height))
        .collect();
    frame.render_widget(
        Paragraph::new(visible),
        Rect::new(inner.x, inner.y, inner.width, content_height),
    );

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("Esc or F1 closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
