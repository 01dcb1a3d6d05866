use tracing::debug;

use super::history::{History, HistoryConfig, HistoryEntry};
use super::model::Document;
use super::schema::MarkSet;
use super::selection::Selection;
use super::transaction::{HistoryAction, Transaction};

/// Immutable-by-convention editor state. New states come from [`apply`].
///
/// [`apply`]: EditorState::apply
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Document,
    selection: Selection,
    stored_marks: Option<MarkSet>,
    history: History,
}

impl EditorState {
    /// Fresh state with the cursor at the start of `doc`.
    pub fn create(doc: Document, history: HistoryConfig) -> Self {
        Self {
            selection: Selection::cursor(doc.start()),
            doc,
            stored_marks: None,
            history: History::new(history),
        }
    }

    pub const fn doc(&self) -> &Document {
        &self.doc
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Marks queued for the next typed text, if any.
    pub const fn stored_marks(&self) -> Option<MarkSet> {
        self.stored_marks
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Start a transaction from this state.
    pub fn tr(&self) -> Transaction {
        Transaction::new(self)
    }

    /// Apply a transaction, producing the next state.
    #[must_use]
    pub fn apply(self, tr: Transaction) -> Self {
        let Self {
            doc,
            selection,
            mut history,
            ..
        } = self;
        let before = HistoryEntry { doc, selection };

        match tr.history_action() {
            Some(HistoryAction::Undo) => {
                history.undo(before);
            }
            Some(HistoryAction::Redo) => {
                history.redo(before);
            }
            None if tr.doc_changed() && tr.add_to_history() => history.record(before, &tr),
            None => {}
        }

        debug!(
            steps = tr.steps().len(),
            undo_depth = history.undo_depth(),
            redo_depth = history.redo_depth(),
            "applied transaction"
        );

        let (doc, selection, stored_marks) = tr.into_parts();
        Self {
            selection: selection.clamped(&doc),
            doc,
            stored_marks,
            history,
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::create(Document::from_seed(""), HistoryConfig::default())
    }
}
