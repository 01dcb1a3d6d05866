//! Formatting toolbar: three mark toggles plus undo/redo.
//!
//! The toolbar mirrors which marks are active at the cursor by listening to
//! the view. It stays inert (every action a no-op) until attached.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::editor::{EditorCommand, EditorState, EditorView, ListenerId, MarkSet, MarkType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Bold,
    Italic,
    Underline,
    Undo,
    Redo,
}

impl ToolbarButton {
    pub const ALL: [Self; 5] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Undo,
        Self::Redo,
    ];

    /// Short glyph shown on the button.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
        }
    }

    /// Accessible title, including the shortcut.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bold => "Bold (Ctrl+B)",
            Self::Italic => "Italic (Ctrl+I)",
            Self::Underline => "Underline (Ctrl+U)",
            Self::Undo => "Undo (Ctrl+Z)",
            Self::Redo => "Redo (Ctrl+Y)",
        }
    }

    pub const fn mark(self) -> Option<MarkType> {
        match self {
            Self::Bold => Some(MarkType::Bold),
            Self::Italic => Some(MarkType::Italic),
            Self::Underline => Some(MarkType::Underline),
            Self::Undo | Self::Redo => None,
        }
    }
}

/// Marks that would apply to text typed now: the stored marks if any,
/// otherwise the marks at the start of the selection.
pub fn active_marks(state: &EditorState) -> MarkSet {
    state
        .stored_marks()
        .unwrap_or_else(|| state.doc().marks_at(state.selection().from()))
}

#[derive(Debug, Default)]
pub struct Toolbar {
    active: Rc<Cell<MarkSet>>,
    subscription: Option<ListenerId>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `view`. Re-attaching replaces the old subscription.
    pub fn attach(&mut self, view: &mut EditorView) {
        if let Some(id) = self.subscription.take() {
            view.unsubscribe(id);
        }
        self.active.set(active_marks(view.state()));
        let active = Rc::clone(&self.active);
        let id = view.subscribe(move |state| active.set(active_marks(state)));
        self.subscription = Some(id);
        debug!(listener = ?id, "toolbar attached");
    }

    /// Stop tracking. Passing `None` (the view is already gone) only drops
    /// the local subscription handle.
    pub fn detach(&mut self, view: Option<&mut EditorView>) {
        let Some(id) = self.subscription.take() else {
            return;
        };
        if let Some(view) = view {
            view.unsubscribe(id);
        }
        self.active.set(MarkSet::EMPTY);
        debug!("toolbar detached");
    }

    pub const fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn active_marks(&self) -> MarkSet {
        self.active.get()
    }

    pub fn is_active(&self, mark: MarkType) -> bool {
        self.active.get().contains(mark)
    }

    pub fn toggle_format(&self, view: Option<&mut EditorView>, mark: MarkType) -> bool {
        self.run(view, &EditorCommand::ToggleMark(mark))
    }

    pub fn undo(&self, view: Option<&mut EditorView>) -> bool {
        self.run(view, &EditorCommand::Undo)
    }

    pub fn redo(&self, view: Option<&mut EditorView>) -> bool {
        self.run(view, &EditorCommand::Redo)
    }

    pub fn click(&self, view: Option<&mut EditorView>, button: ToolbarButton) -> bool {
        match button.mark() {
            Some(mark) => self.toggle_format(view, mark),
            None if button == ToolbarButton::Undo => self.undo(view),
            None => self.redo(view),
        }
    }

    fn run(&self, view: Option<&mut EditorView>, command: &EditorCommand) -> bool {
        if !self.is_attached() {
            return false;
        }
        view.is_some_and(|view| view.run(command))
    }
}
