//! Editing commands. Each returns the transaction to dispatch, or `None`
//! when the command does not apply (a silent no-op).

use super::model::Pos;
use super::schema::{MarkSet, MarkType};
use super::selection::Selection;
use super::state::EditorState;
use super::transaction::{HistoryAction, Transaction};

/// Cursor motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,
}

/// Everything the editor surface can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    ToggleMark(MarkType),
    Undo,
    Redo,
    InsertText(String),
    SplitBlock,
    DeleteBackward,
    DeleteForward,
    SelectAll,
    /// Move the cursor; `extend` keeps the anchor in place.
    Move { motion: Motion, extend: bool },
    /// Collapse the selection at a position (e.g. a mouse click).
    SetCursor(Pos),
}

/// Build the transaction for `command` against `state`.
pub fn execute(state: &EditorState, command: &EditorCommand) -> Option<Transaction> {
    match command {
        EditorCommand::ToggleMark(mark) => toggle_mark(state, *mark),
        EditorCommand::Undo => undo(state),
        EditorCommand::Redo => redo(state),
        EditorCommand::InsertText(text) => insert_text(state, text),
        EditorCommand::SplitBlock => split_block(state),
        EditorCommand::DeleteBackward => delete_backward(state),
        EditorCommand::DeleteForward => delete_forward(state),
        EditorCommand::SelectAll => select_all(state),
        EditorCommand::Move { motion, extend } => move_cursor(state, *motion, *extend),
        EditorCommand::SetCursor(pos) => set_cursor(state, *pos),
    }
}

/// Toggle `mark`.
///
/// With a range selected the mark is removed when the whole range already
/// carries it and added otherwise. With a collapsed cursor only the stored
/// marks change.
pub fn toggle_mark(state: &EditorState, mark: MarkType) -> Option<Transaction> {
    let selection = state.selection();
    if selection.is_empty() {
        let current = state
            .stored_marks()
            .unwrap_or_else(|| state.doc().marks_at(selection.head));
        return Some(state.tr().set_stored_marks(Some(current.toggled(mark))));
    }

    let (from, to) = (selection.from(), selection.to());
    let tr = if state.doc().range_all_have_mark(from, to, mark) {
        state.tr().remove_mark(from, to, mark)
    } else {
        state.tr().add_mark(from, to, mark)
    };
    Some(tr)
}

pub fn undo(state: &EditorState) -> Option<Transaction> {
    let entry = state.history().peek_undo()?;
    Some(
        state
            .tr()
            .replace_document(entry.doc.clone())
            .set_selection(entry.selection)
            .with_history_action(HistoryAction::Undo),
    )
}

pub fn redo(state: &EditorState) -> Option<Transaction> {
    let entry = state.history().peek_redo()?;
    Some(
        state
            .tr()
            .replace_document(entry.doc.clone())
            .set_selection(entry.selection)
            .with_history_action(HistoryAction::Redo),
    )
}

/// Replace the selection with `text`. Line breaks split paragraphs.
///
/// The text takes the stored marks when set, otherwise the marks at the
/// insertion point.
pub fn insert_text(state: &EditorState, text: &str) -> Option<Transaction> {
    if text.is_empty() {
        return None;
    }
    let selection = state.selection();
    let (from, to) = (selection.from(), selection.to());
    let marks: MarkSet = state
        .stored_marks()
        .unwrap_or_else(|| state.doc().marks_across(from, to));

    let mut tr = state.tr().delete(from, to);
    let mut at = from;
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            tr = tr.split(at);
            at = Pos::new(at.block + 1, 0);
        }
        tr = tr.insert_text_at(at, line, marks);
        at.offset += line.chars().count();
    }
    Some(tr.set_selection(Selection::cursor(at)))
}

pub fn split_block(state: &EditorState) -> Option<Transaction> {
    let from = state.selection().from();
    let tr = state
        .tr()
        .delete_selection()
        .split(from)
        .set_selection(Selection::cursor(Pos::new(from.block + 1, 0)));
    Some(tr)
}

/// Backspace: delete the selection, the char before the cursor, or join
/// with the previous paragraph.
pub fn delete_backward(state: &EditorState) -> Option<Transaction> {
    let selection = state.selection();
    if !selection.is_empty() {
        return Some(delete_range(state, selection.from(), selection.to()));
    }
    let head = selection.head;
    if head.offset > 0 {
        return Some(delete_range(
            state,
            Pos::new(head.block, head.offset - 1),
            head,
        ));
    }
    if head.block > 0 {
        let prev = head.block - 1;
        let join_at = Pos::new(prev, state.doc().block_len(prev));
        return Some(delete_range(state, join_at, head));
    }
    None
}

/// Delete: delete the selection, the char after the cursor, or join with
/// the next paragraph.
pub fn delete_forward(state: &EditorState) -> Option<Transaction> {
    let selection = state.selection();
    if !selection.is_empty() {
        return Some(delete_range(state, selection.from(), selection.to()));
    }
    let head = selection.head;
    let doc = state.doc();
    if head.offset < doc.block_len(head.block) {
        return Some(delete_range(
            state,
            head,
            Pos::new(head.block, head.offset + 1),
        ));
    }
    if head.block + 1 < doc.blocks().len() {
        return Some(delete_range(state, head, Pos::new(head.block + 1, 0)));
    }
    None
}

pub fn select_all(state: &EditorState) -> Option<Transaction> {
    let all = Selection::all(state.doc());
    (state.selection() != all).then(|| state.tr().set_selection(all))
}

pub fn move_cursor(state: &EditorState, motion: Motion, extend: bool) -> Option<Transaction> {
    let selection = state.selection();
    let doc = state.doc();

    let next = if extend {
        Selection::range(selection.anchor, motion_target(state, selection.head, motion))
    } else if !selection.is_empty() && motion == Motion::Left {
        Selection::cursor(selection.from())
    } else if !selection.is_empty() && motion == Motion::Right {
        Selection::cursor(selection.to())
    } else {
        Selection::cursor(motion_target(state, selection.head, motion))
    };
    let next = next.clamped(doc);

    (next != selection).then(|| state.tr().set_selection(next))
}

pub fn set_cursor(state: &EditorState, pos: Pos) -> Option<Transaction> {
    let next = Selection::cursor(state.doc().clamp(pos));
    (next != state.selection()).then(|| state.tr().set_selection(next))
}

fn delete_range(state: &EditorState, from: Pos, to: Pos) -> Transaction {
    state
        .tr()
        .delete(from, to)
        .set_selection(Selection::cursor(from))
}

fn motion_target(state: &EditorState, head: Pos, motion: Motion) -> Pos {
    let doc = state.doc();
    let last_block = doc.blocks().len().saturating_sub(1);
    match motion {
        Motion::Left => {
            if head.offset > 0 {
                Pos::new(head.block, head.offset - 1)
            } else if head.block > 0 {
                Pos::new(head.block - 1, doc.block_len(head.block - 1))
            } else {
                head
            }
        }
        Motion::Right => {
            if head.offset < doc.block_len(head.block) {
                Pos::new(head.block, head.offset + 1)
            } else if head.block < last_block {
                Pos::new(head.block + 1, 0)
            } else {
                head
            }
        }
        Motion::Up => {
            if head.block > 0 {
                let block = head.block - 1;
                Pos::new(block, head.offset.min(doc.block_len(block)))
            } else {
                doc.start()
            }
        }
        Motion::Down => {
            if head.block < last_block {
                let block = head.block + 1;
                Pos::new(block, head.offset.min(doc.block_len(block)))
            } else {
                doc.end()
            }
        }
        Motion::LineStart => Pos::new(head.block, 0),
        Motion::LineEnd => Pos::new(head.block, doc.block_len(head.block)),
        Motion::DocStart => doc.start(),
        Motion::DocEnd => doc.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::history::HistoryConfig;
    use crate::editor::model::Document;

    fn state(seed: &str) -> EditorState {
        EditorState::create(
            Document::from_seed(seed),
            HistoryConfig {
                depth: 100,
                new_group_delay_ms: 0,
            },
        )
    }

    fn run(state: EditorState, command: &EditorCommand) -> EditorState {
        match execute(&state, command) {
            Some(tr) => state.apply(tr),
            None => state,
        }
    }

    fn bold() -> MarkSet {
        MarkSet::EMPTY.with(MarkType::Bold)
    }

    // --- Mark toggling ---

    #[test]
    fn test_toggle_mark_on_selection_adds_then_removes() {
        let s = run(state("Hello"), &EditorCommand::SelectAll);
        let s = run(s, &EditorCommand::ToggleMark(MarkType::Bold));
        assert_eq!(s.doc().marks_at(Pos::new(0, 2)), bold());
        let s = run(s, &EditorCommand::ToggleMark(MarkType::Bold));
        assert_eq!(s.doc().marks_at(Pos::new(0, 2)), MarkSet::EMPTY);
    }

    #[test]
    fn test_toggle_mark_on_partially_marked_selection_adds() {
        let s = state("Hello");
        let s = s.clone().apply(
            s.tr()
                .add_mark(Pos::new(0, 0), Pos::new(0, 2), MarkType::Bold),
        );
        let s = run(s, &EditorCommand::SelectAll);
        let s = run(s, &EditorCommand::ToggleMark(MarkType::Bold));
        assert!(s.doc().range_all_have_mark(Pos::new(0, 0), Pos::new(0, 5), MarkType::Bold));
    }

    #[test]
    fn test_toggle_mark_at_cursor_sets_stored_marks() {
        let s = run(state("Hello"), &EditorCommand::ToggleMark(MarkType::Italic));
        assert_eq!(s.stored_marks(), Some(MarkSet::EMPTY.with(MarkType::Italic)));
        assert!(!s.history().can_undo());

        let s = run(s, &EditorCommand::ToggleMark(MarkType::Italic));
        assert_eq!(s.stored_marks(), Some(MarkSet::EMPTY));
    }

    #[test]
    fn test_typing_uses_stored_marks() {
        let s = run(state(""), &EditorCommand::ToggleMark(MarkType::Bold));
        let s = run(s, &EditorCommand::InsertText("hi".to_string()));
        assert_eq!(s.doc().marks_at(Pos::new(0, 1)), bold());
        assert_eq!(s.stored_marks(), None);
    }

    #[test]
    fn test_typing_inherits_marks_from_run_before() {
        let s = run(state("Hello"), &EditorCommand::SelectAll);
        let s = run(s, &EditorCommand::ToggleMark(MarkType::Bold));
        let s = run(
            s,
            &EditorCommand::Move {
                motion: Motion::DocEnd,
                extend: false,
            },
        );
        let s = run(s, &EditorCommand::InsertText("!".to_string()));
        assert_eq!(s.doc().blocks()[0].runs().len(), 1);
        assert_eq!(s.doc().marks_at(Pos::new(0, 6)), bold());
    }

    // --- Text editing ---

    #[test]
    fn test_insert_text_replaces_selection() {
        let s = run(state("Hello"), &EditorCommand::SelectAll);
        let s = run(s, &EditorCommand::InsertText("Bye".to_string()));
        assert_eq!(s.doc().flatten_text(), "Bye");
        assert_eq!(s.selection(), Selection::cursor(Pos::new(0, 3)));
    }

    #[test]
    fn test_insert_text_with_newline_splits() {
        let s = run(state(""), &EditorCommand::InsertText("a\nb".to_string()));
        assert_eq!(s.doc().blocks().len(), 2);
        assert_eq!(s.doc().flatten_text(), "a\nb");
        assert_eq!(s.selection().head, Pos::new(1, 1));
    }

    #[test]
    fn test_split_block_moves_cursor_to_new_paragraph() {
        let s = run(
            state("Hello"),
            &EditorCommand::SetCursor(Pos::new(0, 2)),
        );
        let s = run(s, &EditorCommand::SplitBlock);
        assert_eq!(s.doc().flatten_text(), "He\nllo");
        assert_eq!(s.selection().head, Pos::new(1, 0));
    }

    #[test]
    fn test_delete_backward_at_doc_start_is_noop() {
        let s = state("Hello");
        assert!(delete_backward(&s).is_none());
    }

    #[test]
    fn test_delete_backward_joins_paragraphs() {
        let s = run(state("Hello"), &EditorCommand::SetCursor(Pos::new(0, 2)));
        let s = run(s, &EditorCommand::SplitBlock);
        let s = run(s, &EditorCommand::DeleteBackward);
        assert_eq!(s.doc().flatten_text(), "Hello");
        assert_eq!(s.selection().head, Pos::new(0, 2));
    }

    #[test]
    fn test_delete_forward_at_doc_end_is_noop() {
        let s = run(
            state("Hi"),
            &EditorCommand::Move {
                motion: Motion::DocEnd,
                extend: false,
            },
        );
        assert!(delete_forward(&s).is_none());
        let s = run(s, &EditorCommand::DeleteBackward);
        assert_eq!(s.doc().flatten_text(), "H");
    }

    // --- History ---

    #[test]
    fn test_undo_and_redo_restore_projection() {
        let s = run(state("Hello"), &EditorCommand::SelectAll);
        let s = run(s, &EditorCommand::InsertText("Bye".to_string()));
        let s = run(s, &EditorCommand::Undo);
        assert_eq!(s.doc().flatten_text(), "Hello");
        assert_eq!(s.selection(), Selection::all(s.doc()));
        let s = run(s, &EditorCommand::Redo);
        assert_eq!(s.doc().flatten_text(), "Bye");
    }

    #[test]
    fn test_undo_with_empty_history_is_noop() {
        let s = state("Hello");
        assert!(undo(&s).is_none());
        assert!(redo(&s).is_none());
    }

    // --- Selection ---

    #[test]
    fn test_shift_motion_extends_selection() {
        let s = run(
            state("Hello"),
            &EditorCommand::Move {
                motion: Motion::LineEnd,
                extend: true,
            },
        );
        assert_eq!(s.selection(), Selection::range(Pos::new(0, 0), Pos::new(0, 5)));
    }

    #[test]
    fn test_left_collapses_range_to_start() {
        let s = run(state("Hello"), &EditorCommand::SelectAll);
        let s = run(
            s,
            &EditorCommand::Move {
                motion: Motion::Left,
                extend: false,
            },
        );
        assert_eq!(s.selection(), Selection::cursor(Pos::new(0, 0)));
    }

    #[test]
    fn test_motion_at_boundary_is_noop() {
        let s = state("Hello");
        assert!(move_cursor(&s, Motion::Left, false).is_none());
        assert!(move_cursor(&s, Motion::Up, false).is_none());
    }

    #[test]
    fn test_up_down_keep_offset_clamped() {
        let s = run(state(""), &EditorCommand::InsertText("long line\nab".to_string()));
        let s = run(
            s,
            &EditorCommand::Move {
                motion: Motion::Up,
                extend: false,
            },
        );
        assert_eq!(s.selection().head, Pos::new(0, 2));
        let s = run(s, &EditorCommand::Move { motion: Motion::LineEnd, extend: false });
        let s = run(s, &EditorCommand::Move { motion: Motion::Down, extend: false });
        assert_eq!(s.selection().head, Pos::new(1, 2));
    }
}
