use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use richpad::editor::{
    EditorCommand, EditorView, HistoryConfig, MarkSet, MarkType, Motion, Pos, Selection,
};
use richpad::shell::{EditorShell, ShellOptions};
use richpad::toolbar::Toolbar;

type Log = Rc<RefCell<Vec<String>>>;

fn options() -> ShellOptions {
    ShellOptions {
        history: HistoryConfig {
            depth: 100,
            new_group_delay_ms: 0,
        },
    }
}

fn mount(seed: &str) -> (EditorShell, Log) {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    let shell = EditorShell::new(
        seed,
        options(),
        Some(Box::new(move |text: &str| sink.borrow_mut().push(text.to_string()))),
    )
    .unwrap();
    (shell, log)
}

fn view(shell: &mut EditorShell) -> &mut EditorView {
    shell.view_mut().unwrap()
}

fn select(view: &mut EditorView, from: usize, to: usize) {
    let tr = view
        .state()
        .tr()
        .set_selection(Selection::range(Pos::new(0, from), Pos::new(0, to)));
    view.dispatch(tr);
}

fn mark_strategy() -> impl Strategy<Value = MarkType> {
    prop_oneof![
        Just(MarkType::Bold),
        Just(MarkType::Italic),
        Just(MarkType::Underline),
    ]
}

fn marks_by_offset(view: &EditorView) -> Vec<MarkSet> {
    view.state().doc().blocks()[0]
        .chars_with_marks()
        .map(|(_, marks)| marks)
        .collect()
}

#[derive(Debug, Clone)]
enum Edit {
    Type(String),
    Backspace,
    Enter,
    Toggle(MarkType),
    Move(Motion, bool),
    SelectAll,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        "[a-z ]{1,4}".prop_map(Edit::Type),
        Just(Edit::Backspace),
        Just(Edit::Enter),
        mark_strategy().prop_map(Edit::Toggle),
        (
            prop_oneof![
                Just(Motion::Left),
                Just(Motion::Right),
                Just(Motion::Up),
                Just(Motion::Down),
                Just(Motion::LineStart),
                Just(Motion::LineEnd),
            ],
            any::<bool>()
        )
            .prop_map(|(motion, extend)| Edit::Move(motion, extend)),
        Just(Edit::SelectAll),
    ]
}

fn command(edit: &Edit) -> EditorCommand {
    match edit {
        Edit::Type(text) => EditorCommand::InsertText(text.clone()),
        Edit::Backspace => EditorCommand::DeleteBackward,
        Edit::Enter => EditorCommand::SplitBlock,
        Edit::Toggle(mark) => EditorCommand::ToggleMark(*mark),
        Edit::Move(motion, extend) => EditorCommand::Move {
            motion: *motion,
            extend: *extend,
        },
        Edit::SelectAll => EditorCommand::SelectAll,
    }
}

proptest! {
    #[test]
    fn prop_initial_projection_is_trimmed_seed(seed in "[ a-zA-Z0-9.,!?]{0,40}") {
        let (shell, log) = mount(&seed);
        prop_assert_eq!(shell.flattened_text().unwrap(), seed.trim());
        prop_assert!(log.borrow().is_empty());
    }

    #[test]
    fn prop_toggle_twice_restores_marks(
        seed in "[a-z]{2,20}",
        mark in mark_strategy(),
        bounds in (0usize..20, 0usize..20),
        already_marked in any::<bool>(),
    ) {
        let len = seed.chars().count();
        let (a, b) = (bounds.0 % len, bounds.1 % len);
        let (from, to) = if a == b { (a, a + 1) } else { (a.min(b), a.max(b)) };
        let other = MarkType::ALL
            .into_iter()
            .find(|&m| m != mark)
            .unwrap();

        let (mut shell, _log) = mount(&seed);
        let view = view(&mut shell);
        // Split the text into differently formatted runs.
        select(view, 0, len / 2);
        view.run(&EditorCommand::ToggleMark(other));

        select(view, from, to);
        if already_marked {
            view.run(&EditorCommand::ToggleMark(mark));
        }
        let before = marks_by_offset(view);
        view.run(&EditorCommand::ToggleMark(mark));
        view.run(&EditorCommand::ToggleMark(mark));
        prop_assert_eq!(marks_by_offset(view), before);
    }

    #[test]
    fn prop_callback_matches_document_after_each_change(
        edits in proptest::collection::vec(edit_strategy(), 1..30),
    ) {
        let (mut shell, log) = mount("Hello");
        let view = view(&mut shell);
        for edit in &edits {
            let before_doc = view.state().doc().clone();
            let calls_before = log.borrow().len();
            view.run(&command(edit));
            let calls = log.borrow().len() - calls_before;
            prop_assert!(calls <= 1);
            if calls == 1 {
                let flattened = view.state().doc().flatten_text();
                prop_assert_eq!(log.borrow().last().cloned(), Some(flattened));
            }
            if matches!(edit, Edit::Move(..) | Edit::SelectAll) {
                prop_assert_eq!(calls, 0);
                prop_assert_eq!(view.state().doc(), &before_doc);
            }
        }
    }

    #[test]
    fn prop_undo_redo_restore_projections(
        edits in proptest::collection::vec(edit_strategy(), 1..20),
    ) {
        let (mut shell, _log) = mount("Hello");
        let view = view(&mut shell);
        for edit in &edits {
            view.run(&command(edit));
        }
        let edited = view.state().doc().flatten_text();
        let undo_depth = view.state().history().undo_depth();
        prop_assume!(undo_depth > 0);

        let before_undo = edited.clone();
        let previous = view.state().history().peek_undo().unwrap().doc.flatten_text();
        prop_assert!(view.run(&EditorCommand::Undo));
        prop_assert_eq!(view.state().doc().flatten_text(), previous);
        prop_assert!(view.run(&EditorCommand::Redo));
        prop_assert_eq!(view.state().doc().flatten_text(), before_undo);
    }
}

#[test]
fn test_active_marks_follow_cursor() {
    let (mut shell, _log) = mount("Hello world");
    let view = view(&mut shell);
    let mut toolbar = Toolbar::new();
    toolbar.attach(view);

    select(view, 0, 5);
    view.run(&EditorCommand::ToggleMark(MarkType::Bold));

    view.run(&EditorCommand::SetCursor(Pos::new(0, 2)));
    assert_eq!(toolbar.active_marks(), MarkSet::EMPTY.with(MarkType::Bold));
    view.run(&EditorCommand::SetCursor(Pos::new(0, 8)));
    assert_eq!(toolbar.active_marks(), MarkSet::EMPTY);
}

#[test]
fn test_bold_then_undo_scenario() {
    let (mut shell, log) = mount("Hello");
    assert_eq!(shell.flattened_text().as_deref(), Some("Hello"));

    let mut toolbar = Toolbar::new();
    toolbar.attach(view(&mut shell));

    view(&mut shell).run(&EditorCommand::SelectAll);
    assert!(toolbar.toggle_format(shell.view_mut(), MarkType::Bold));
    assert_eq!(shell.flattened_text().as_deref(), Some("Hello"));
    assert_eq!(toolbar.active_marks(), MarkSet::EMPTY.with(MarkType::Bold));

    assert!(toolbar.undo(shell.view_mut()));
    assert_eq!(toolbar.active_marks(), MarkSet::EMPTY);
    assert_eq!(log.borrow().as_slice(), ["Hello".to_string(), "Hello".to_string()]);

    toolbar.detach(shell.view_mut());
    shell.unmount();
    assert!(!toolbar.click(shell.view_mut(), richpad::toolbar::ToolbarButton::Bold));
}

#[test]
fn test_formatting_undoes_separately_from_typing_with_default_grouping() {
    let mut shell = EditorShell::new("", ShellOptions::default(), None).unwrap();
    let view = view(&mut shell);
    view.run(&EditorCommand::InsertText("abc".to_string()));
    view.run(&EditorCommand::SelectAll);
    view.run(&EditorCommand::ToggleMark(MarkType::Bold));
    assert_eq!(view.state().history().undo_depth(), 2);

    assert!(view.run(&EditorCommand::Undo));
    assert_eq!(view.state().doc().flatten_text(), "abc");
    assert_eq!(marks_by_offset(view), vec![MarkSet::EMPTY; 3]);
}

#[test]
fn test_quick_toggles_undo_one_at_a_time_with_default_grouping() {
    let mut shell = EditorShell::new("Hello", ShellOptions::default(), None).unwrap();
    let view = view(&mut shell);
    let mut toolbar = Toolbar::new();
    toolbar.attach(view);

    view.run(&EditorCommand::SelectAll);
    view.run(&EditorCommand::ToggleMark(MarkType::Bold));
    view.run(&EditorCommand::ToggleMark(MarkType::Italic));

    assert!(view.run(&EditorCommand::Undo));
    assert_eq!(toolbar.active_marks(), MarkSet::EMPTY.with(MarkType::Bold));
    assert!(view.run(&EditorCommand::Undo));
    assert_eq!(toolbar.active_marks(), MarkSet::EMPTY);
}
