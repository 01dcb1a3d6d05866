use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::Model;
use crate::editor::{EditorView, Pos};

use super::wrap::{VisualLine, visual_position};
use super::{PREVIEW_HEIGHT_PERCENT, overlays, status, style, toolbar};

/// Screen regions of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub toolbar: Rect,
    /// Editor frame including its border.
    pub editor: Rect,
    /// Text area inside the editor border.
    pub editor_content: Rect,
    pub preview: Option<Rect>,
    pub status: Rect,
}

pub fn layout(area: Rect, preview_visible: bool) -> AppLayout {
    let mut constraints = vec![Constraint::Length(1), Constraint::Min(3)];
    if preview_visible {
        constraints.push(Constraint::Percentage(PREVIEW_HEIGHT_PERCENT));
    }
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let editor = chunks[1];
    AppLayout {
        toolbar: chunks[0],
        editor,
        editor_content: editor_block().inner(editor),
        preview: preview_visible.then(|| chunks[2]),
        status: chunks[chunks.len() - 1],
    }
}

fn editor_block() -> Block<'static> {
    Block::default().title(" Editor ").borders(Borders::ALL)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let regions = layout(area, model.preview_visible);

    toolbar::render_toolbar(model, frame, regions.toolbar);
    render_editor(model, frame, &regions);
    if let Some(preview) = regions.preview {
        render_preview(model, frame, preview);
    }
    status::render_status_bar(model, frame, regions.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, regions: &AppLayout) {
    frame.render_widget(Clear, regions.editor);
    frame.render_widget(editor_block(), regions.editor);

    let Some(view) = model.shell.view() else {
        return;
    };
    let content = regions.editor_content;
    let lines = model.wrapped_lines();
    let start = model.scroll_offset.min(lines.len().saturating_sub(1));
    let end = (start + usize::from(content.height)).min(lines.len());

    let rendered: Vec<Line> = lines[start..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| render_line(view, &lines, start + idx, line))
        .collect();
    frame.render_widget(Paragraph::new(rendered), content);
}

fn render_line(
    view: &EditorView,
    lines: &[VisualLine],
    row: usize,
    line: &VisualLine,
) -> Line<'static> {
    let state = view.state();
    let selection = state.selection();
    let cursor = selection.is_empty().then_some(selection.head);
    let cursor_on_row =
        cursor.filter(|&pos| visual_position(state.doc(), lines, pos).0 == row);

    let Some(paragraph) = state.doc().block(line.block) else {
        return Line::default();
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut pending = String::new();
    let mut pending_style = Style::default();
    for (offset, (ch, marks)) in paragraph
        .chars_with_marks()
        .enumerate()
        .skip(line.start)
        .take(line.end - line.start)
    {
        let pos = Pos::new(line.block, offset);
        let base = style::mark_style(marks);
        let cell_style = if cursor_on_row == Some(pos) {
            style::cursor_style(base)
        } else if selection.covers(pos) {
            style::selection_style(base)
        } else {
            base
        };
        if cell_style != pending_style && !pending.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut pending), pending_style));
        }
        pending_style = cell_style;
        pending.push(ch);
    }
    if !pending.is_empty() {
        spans.push(Span::styled(pending, pending_style));
    }

    // Cursor past the last drawn char of the row.
    if let Some(pos) = cursor_on_row
        && pos.offset >= line.end
    {
        spans.push(Span::styled(" ", style::cursor_style(Style::default())));
    }
    Line::from(spans)
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" Plain text ({} changes) ", model.change_count()))
        .borders(Borders::ALL);
    let preview = Paragraph::new(model.preview_text())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(preview, area);
}
