use tracing::trace;

use crate::app::Model;
use crate::editor::{EditorCommand, Pos, Selection};
use crate::toolbar::ToolbarButton;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Run an editor command (typing, motion, formatting, history)
    Editor(EditorCommand),
    /// Extend the selection to a position (mouse drag)
    DragTo(Pos),

    // Toolbar
    /// A toolbar button was clicked
    ToolbarClick(ToolbarButton),

    // Viewport
    /// Scroll editor rows up by n
    ScrollUp(usize),
    /// Scroll editor rows down by n
    ScrollDown(usize),

    // Overlays
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // System
    /// Terminal resized
    Resize(u16, u16),
    /// Quit application
    Quit,
}

/// Update the model for one message.
///
/// Editor-facing messages go through the view's dispatch, which fires the
/// change callback and toolbar listener synchronously.
pub fn update(mut model: Model, msg: Message) -> Model {
    trace!(?msg, "update");
    match msg {
        Message::Editor(command) => {
            if let Some(view) = model.shell.view_mut() {
                view.run(&command);
            }
            model.ensure_cursor_visible();
        }
        Message::DragTo(pos) => {
            if let Some(view) = model.shell.view_mut() {
                let current = view.state().selection();
                let next = Selection::range(current.anchor, pos).clamped(view.state().doc());
                if next != current {
                    let tr = view.state().tr().set_selection(next);
                    view.dispatch(tr);
                }
            }
            model.ensure_cursor_visible();
        }
        Message::ToolbarClick(button) => {
            model.toolbar.click(model.shell.view_mut(), button);
            model.ensure_cursor_visible();
        }
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            model.scroll_offset = model.scroll_offset.saturating_add(n);
            let total = model.wrapped_lines().len();
            model.clamp_scroll(total);
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.ensure_cursor_visible();
        }
        Message::Quit => {
            model.teardown();
            model.should_quit = true;
        }
    }
    model
}
