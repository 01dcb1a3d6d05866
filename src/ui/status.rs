use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

use super::style;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(view) = model.shell.view() else {
        let bar = Paragraph::new(" richpad  [closed]").style(style::status_style());
        frame.render_widget(bar, area);
        return;
    };
    let state = view.state();
    let head = state.selection().head;
    let marks = model.toolbar.active_marks();
    let marks_info = if marks.is_empty() {
        String::new()
    } else {
        format!("  {marks}")
    };
    let history = state.history();

    let status = format!(
        " richpad  Ln {}, Col {}{}  undo:{} redo:{}  F1:help  Ctrl+Q:quit",
        head.block + 1,
        head.offset + 1,
        marks_info,
        history.undo_depth(),
        history.redo_depth(),
    );
    let bar = Paragraph::new(status).style(style::status_style());
    frame.render_widget(bar, area);
}
