//! Headless rich-text editing core.
//!
//! A document is a list of paragraphs holding runs of marked text. All
//! edits go through a [`Transaction`] applied to an [`EditorState`]; the
//! [`EditorView`] owns the live state and is the only dispatch path.

pub mod commands;
pub mod history;
pub mod keymap;
pub mod model;
pub mod schema;
pub mod selection;
pub mod state;
pub mod transaction;
pub mod view;

pub use commands::{EditorCommand, Motion};
pub use history::{History, HistoryConfig, HistoryEntry};
pub use keymap::{Key, KeyChord, Keymap, KeymapError};
pub use model::{Document, Paragraph, Pos, TextRun};
pub use schema::{MarkSet, MarkType, NodeType, Schema, SchemaError};
pub use selection::Selection;
pub use state::EditorState;
pub use transaction::{HistoryAction, Step, Transaction};
pub use view::{ChangeSink, EditorView, ListenerId};
