//! Transactions: an ordered list of steps plus the selection and stored
//! marks they leave behind.

use super::model::{Document, Pos};
use super::schema::{MarkSet, MarkType};
use super::selection::Selection;
use super::state::EditorState;

/// One atomic change to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    InsertText {
        at: Pos,
        text: String,
        marks: MarkSet,
    },
    Delete {
        from: Pos,
        to: Pos,
    },
    Split {
        at: Pos,
    },
    AddMark {
        from: Pos,
        to: Pos,
        mark: MarkType,
    },
    RemoveMark {
        from: Pos,
        to: Pos,
        mark: MarkType,
    },
    /// Whole-document swap used by undo and redo.
    ReplaceDocument,
}

impl Step {
    /// Map a position from before this step to after it.
    pub fn map(&self, pos: Pos) -> Pos {
        match self {
            Self::InsertText { at, text, .. } => {
                if pos.block == at.block && pos.offset >= at.offset {
                    Pos::new(pos.block, pos.offset + text.chars().count())
                } else {
                    pos
                }
            }
            Self::Delete { from, to } => {
                if pos <= *from {
                    pos
                } else if pos >= *to {
                    if pos.block == to.block {
                        Pos::new(from.block, from.offset + (pos.offset - to.offset))
                    } else {
                        Pos::new(pos.block - (to.block - from.block), pos.offset)
                    }
                } else {
                    *from
                }
            }
            Self::Split { at } => {
                if pos.block == at.block && pos.offset >= at.offset {
                    Pos::new(pos.block + 1, pos.offset - at.offset)
                } else if pos.block > at.block {
                    Pos::new(pos.block + 1, pos.offset)
                } else {
                    pos
                }
            }
            Self::AddMark { .. } | Self::RemoveMark { .. } | Self::ReplaceDocument => pos,
        }
    }

    /// Whether this step moves content around. Mark steps leave every
    /// position where it was and never continue an undo group.
    pub const fn maps_content(&self) -> bool {
        matches!(
            self,
            Self::InsertText { .. } | Self::Delete { .. } | Self::Split { .. }
        )
    }

    /// Whether this step edits content at `pos` (used for undo grouping).
    pub fn touches(&self, pos: Pos) -> bool {
        match self {
            Self::InsertText { at, .. } | Self::Split { at } => *at == pos,
            Self::Delete { from, to } => *from <= pos && pos <= *to,
            Self::AddMark { .. } | Self::RemoveMark { .. } | Self::ReplaceDocument => false,
        }
    }
}

/// Marks a transaction as an undo or redo so history moves the right way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

/// A describable state change, built from an [`EditorState`] and applied
/// with [`EditorState::apply`].
#[derive(Debug, Clone)]
pub struct Transaction {
    doc: Document,
    selection: Selection,
    stored_marks: Option<MarkSet>,
    steps: Vec<Step>,
    add_to_history: bool,
    history_action: Option<HistoryAction>,
    time_ms: Option<u64>,
}

impl Transaction {
    pub(crate) fn new(state: &EditorState) -> Self {
        Self {
            doc: state.doc().clone(),
            selection: state.selection(),
            stored_marks: state.stored_marks(),
            steps: Vec::new(),
            add_to_history: true,
            history_action: None,
            time_ms: None,
        }
    }

    pub const fn doc(&self) -> &Document {
        &self.doc
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub const fn stored_marks(&self) -> Option<MarkSet> {
        self.stored_marks
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether any step changed the document.
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub const fn add_to_history(&self) -> bool {
        self.add_to_history
    }

    pub const fn history_action(&self) -> Option<HistoryAction> {
        self.history_action
    }

    pub const fn time_ms(&self) -> Option<u64> {
        self.time_ms
    }

    /// Whether every step moves content, so the change may extend an
    /// undo group.
    pub fn maps_content(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(Step::maps_content)
    }

    #[must_use]
    pub fn insert_text_at(mut self, at: Pos, text: &str, marks: MarkSet) -> Self {
        if text.is_empty() {
            return self;
        }
        self.doc.insert_text(at, text, marks);
        self.push_step(Step::InsertText {
            at,
            text: text.to_string(),
            marks,
        });
        self
    }

    #[must_use]
    pub fn delete(mut self, from: Pos, to: Pos) -> Self {
        if from >= to {
            return self;
        }
        self.doc.delete(from, to);
        self.push_step(Step::Delete { from, to });
        self
    }

    /// Delete the selected range, if any.
    #[must_use]
    pub fn delete_selection(self) -> Self {
        let (from, to) = (self.selection.from(), self.selection.to());
        self.delete(from, to)
    }

    #[must_use]
    pub fn split(mut self, at: Pos) -> Self {
        self.doc.split(at);
        self.push_step(Step::Split { at });
        self
    }

    #[must_use]
    pub fn add_mark(mut self, from: Pos, to: Pos, mark: MarkType) -> Self {
        if self.doc.add_mark(from, to, mark) {
            self.push_step(Step::AddMark { from, to, mark });
        }
        self
    }

    #[must_use]
    pub fn remove_mark(mut self, from: Pos, to: Pos, mark: MarkType) -> Self {
        if self.doc.remove_mark(from, to, mark) {
            self.push_step(Step::RemoveMark { from, to, mark });
        }
        self
    }

    #[must_use]
    pub fn replace_document(mut self, doc: Document) -> Self {
        self.doc = doc;
        self.push_step(Step::ReplaceDocument);
        self
    }

    /// Replace the selection. Clears stored marks.
    #[must_use]
    pub fn set_selection(mut self, selection: Selection) -> Self {
        self.selection = selection.clamped(&self.doc);
        self.stored_marks = None;
        self
    }

    #[must_use]
    pub const fn set_stored_marks(mut self, marks: Option<MarkSet>) -> Self {
        self.stored_marks = marks;
        self
    }

    #[must_use]
    pub const fn with_time(mut self, time_ms: u64) -> Self {
        self.time_ms = Some(time_ms);
        self
    }

    #[must_use]
    pub const fn with_add_to_history(mut self, add: bool) -> Self {
        self.add_to_history = add;
        self
    }

    #[must_use]
    pub(crate) const fn with_history_action(mut self, action: HistoryAction) -> Self {
        self.history_action = Some(action);
        self
    }

    pub(crate) fn into_parts(self) -> (Document, Selection, Option<MarkSet>) {
        (self.doc, self.selection, self.stored_marks)
    }

    fn push_step(&mut self, step: Step) {
        let anchor = step.map(self.selection.anchor);
        let head = step.map(self.selection.head);
        self.selection = Selection::range(anchor, head).clamped(&self.doc);
        self.stored_marks = None;
        self.steps.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::history::HistoryConfig;

    fn state(seed: &str) -> EditorState {
        EditorState::create(crate::editor::Document::from_seed(seed), HistoryConfig::default())
    }

    #[test]
    fn test_selection_only_transaction_is_not_doc_change() {
        let s = state("Hello");
        let tr = s.tr().set_selection(Selection::cursor(Pos::new(0, 3)));
        assert!(!tr.doc_changed());
        assert_eq!(tr.selection().head, Pos::new(0, 3));
    }

    #[test]
    fn test_insert_maps_cursor_after_text() {
        let s = state("Hello");
        let tr = s
            .tr()
            .set_selection(Selection::cursor(Pos::new(0, 5)))
            .insert_text_at(Pos::new(0, 5), "!!", MarkSet::EMPTY);
        assert!(tr.doc_changed());
        assert_eq!(tr.selection().head, Pos::new(0, 7));
        assert!(tr.maps_content());
    }

    #[test]
    fn test_step_clears_stored_marks() {
        let s = state("Hello");
        let tr = s
            .tr()
            .set_stored_marks(Some(MarkSet::EMPTY.with(MarkType::Bold)))
            .insert_text_at(Pos::new(0, 0), "x", MarkSet::EMPTY);
        assert_eq!(tr.stored_marks(), None);
    }

    #[test]
    fn test_noop_mark_step_is_not_recorded() {
        let s = state("Hello");
        let tr = s.tr().remove_mark(Pos::new(0, 0), Pos::new(0, 5), MarkType::Bold);
        assert!(!tr.doc_changed());
    }

    #[test]
    fn test_mark_steps_never_touch_positions() {
        let s = state("Hello");
        let tr = s.tr().add_mark(Pos::new(0, 0), Pos::new(0, 5), MarkType::Bold);
        assert!(tr.doc_changed());
        assert!(!tr.maps_content());
        assert!(!tr.steps()[0].touches(Pos::new(0, 5)));
        assert!(!tr.steps()[0].touches(Pos::new(0, 2)));
    }

    #[test]
    fn test_delete_maps_positions_after_range() {
        let step = Step::Delete {
            from: Pos::new(0, 2),
            to: Pos::new(1, 1),
        };
        assert_eq!(step.map(Pos::new(1, 3)), Pos::new(0, 4));
        assert_eq!(step.map(Pos::new(2, 3)), Pos::new(1, 3));
        assert_eq!(step.map(Pos::new(0, 5)), Pos::new(0, 2));
        assert_eq!(step.map(Pos::new(0, 1)), Pos::new(0, 1));
    }

    #[test]
    fn test_split_maps_positions_into_new_block() {
        let step = Step::Split { at: Pos::new(0, 2) };
        assert_eq!(step.map(Pos::new(0, 4)), Pos::new(1, 2));
        assert_eq!(step.map(Pos::new(0, 1)), Pos::new(0, 1));
        assert_eq!(step.map(Pos::new(1, 0)), Pos::new(2, 0));
    }
}
