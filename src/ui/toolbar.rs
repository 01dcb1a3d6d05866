use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::toolbar::ToolbarButton;

use super::style;

/// Columns between the formatting group and the history group.
const GROUP_GAP: u16 = 3;

/// Screen rect of each toolbar button, left to right.
pub fn toolbar_segments(area: Rect) -> Vec<(ToolbarButton, Rect)> {
    let mut x = area.x.saturating_add(1);
    let mut segments = Vec::with_capacity(ToolbarButton::ALL.len());
    for button in ToolbarButton::ALL {
        if button == ToolbarButton::Undo {
            x = x.saturating_add(GROUP_GAP - 1);
        }
        #[allow(clippy::cast_possible_truncation)]
        let width = button.label().len() as u16 + 2;
        let right = area.x.saturating_add(area.width);
        if x >= right {
            break;
        }
        let width = width.min(right - x);
        segments.push((button, Rect::new(x, area.y, width, 1)));
        x = x.saturating_add(width + 1);
    }
    segments
}

pub fn toolbar_button_at(area: Rect, column: u16, row: u16) -> Option<ToolbarButton> {
    toolbar_segments(area)
        .into_iter()
        .find(|(_, rect)| rect.contains(Position::new(column, row)))
        .map(|(button, _)| button)
}

pub fn render_toolbar(model: &Model, frame: &mut Frame, area: Rect) {
    let history = model.shell.view().map(|view| view.state().history());
    let mounted = model.shell.is_mounted() && model.toolbar.is_attached();

    let mut spans = Vec::new();
    let mut cursor_x = area.x;
    for (button, rect) in toolbar_segments(area) {
        let pad = rect.x.saturating_sub(cursor_x);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(usize::from(pad))));
        }
        let (active, enabled) = match button.mark() {
            Some(mark) => (model.toolbar.is_active(mark), mounted),
            None if button == ToolbarButton::Undo => {
                (false, mounted && history.is_some_and(|h| h.can_undo()))
            }
            None => (false, mounted && history.is_some_and(|h| h.can_redo())),
        };
        let label = format!(" {} ", button.label());
        let label: String = label.chars().take(usize::from(rect.width)).collect();
        spans.push(Span::styled(label, style::button_style(active, enabled)));
        cursor_x = rect.x + rect.width;
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
