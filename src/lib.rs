// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorView)
    clippy::module_name_repetitions
)]

//! # Richpad
//!
//! A terminal rich-text editor with a formatting toolbar.
//!
//! Richpad edits paragraphs of text with bold, italic and underline marks,
//! keeps an undo history, and reports a plain-text projection of the
//! document after every change.
//!
//! ## Architecture
//!
//! Richpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: State transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Headless editing core (schema, document, transactions, history)
//! - [`shell`]: Mounts an editor and forwards text changes
//! - [`toolbar`]: Formatting and history buttons with active-mark tracking
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved default flags

pub mod app;
pub mod config;
pub mod editor;
pub mod shell;
pub mod toolbar;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{Document, EditorCommand, EditorState, EditorView, MarkType};
    pub use crate::shell::{EditorShell, ShellOptions};
    pub use crate::toolbar::{Toolbar, ToolbarButton};
}
