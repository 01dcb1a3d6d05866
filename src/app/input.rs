use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Message, Model};
use crate::editor::{EditorCommand, Key, KeyChord, Pos};
use crate::ui::wrap::position_at;

use super::event_loop::ResizeDebouncer;

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: usize = 3;

/// Translate a crossterm key event into a chord. Returns `None` for keys
/// the editor has no name for.
pub fn key_chord(key: &KeyEvent) -> Option<KeyChord> {
    let mut shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let code = match key.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            shift = true;
            Key::Tab
        }
        KeyCode::Esc => Key::Esc,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    let chord = KeyChord {
        key: code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift,
    };
    Some(chord.normalized())
}

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(width, height) => {
                resize_debouncer.queue(*width, *height, now_ms);
                None
            }
            Event::Paste(text) => Some(Message::Editor(EditorCommand::InsertText(
                text.replace("\r\n", "\n").replace('\r', "\n"),
            ))),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            _ => {}
        }
        if model.help_visible {
            return matches!(key.code, KeyCode::Esc).then_some(Message::HideHelp);
        }

        let chord = key_chord(&key)?;
        if let Some(command) = model
            .shell
            .view()
            .and_then(|view| view.keymap().lookup(&chord))
        {
            return Some(Message::Editor(command.clone()));
        }

        let page = usize::from(model.layout().editor_content.height.max(1));
        match key.code {
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::Editor(EditorCommand::InsertText(ch.to_string())))
            }
            KeyCode::PageUp => Some(Message::ScrollUp(page)),
            KeyCode::PageDown => Some(Message::ScrollDown(page)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return matches!(mouse.kind, MouseEventKind::Down(_)).then_some(Message::HideHelp);
        }
        let layout = model.layout();
        let at = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.toolbar.contains(at) {
                    return crate::ui::toolbar_button_at(layout.toolbar, mouse.column, mouse.row)
                        .map(Message::ToolbarClick);
                }
                if layout.editor_content.contains(at) {
                    let pos = editor_pos_at(model, layout.editor_content, at)?;
                    return Some(Message::Editor(EditorCommand::SetCursor(pos)));
                }
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                editor_pos_at(model, layout.editor_content, at).map(Message::DragTo)
            }
            MouseEventKind::ScrollUp if layout.editor.contains(at) => {
                Some(Message::ScrollUp(WHEEL_ROWS))
            }
            MouseEventKind::ScrollDown if layout.editor.contains(at) => {
                Some(Message::ScrollDown(WHEEL_ROWS))
            }
            _ => None,
        }
    }
}

/// Document position under a screen cell, clamping points outside the
/// editor text area to its edges.
fn editor_pos_at(model: &Model, content: Rect, at: Position) -> Option<Pos> {
    let view = model.shell.view()?;
    let lines = model.wrapped_lines();
    let row = at
        .y
        .clamp(content.y, content.bottom().saturating_sub(1).max(content.y))
        .saturating_sub(content.y);
    let col = at.x.saturating_sub(content.x);
    Some(position_at(
        view.state().doc(),
        &lines,
        model.scroll_offset + usize::from(row),
        usize::from(col),
    ))
}
