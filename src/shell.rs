//! Editor shell: builds the schema, initial document and editing state,
//! mounts the view, and forwards flattened text to an optional observer.

use thiserror::Error;
use tracing::{debug, info};

use crate::editor::{
    ChangeSink, Document, EditorState, EditorView, HistoryConfig, Keymap, KeymapError, Schema,
    SchemaError,
};

/// Placeholder hint recorded on the surface. Never drawn.
pub const PLACEHOLDER: &str = "Start typing...";

/// Errors that abort mounting.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("invalid initial document: {0}")]
    Schema(#[from] SchemaError),
    #[error("invalid key binding: {0}")]
    Keymap(#[from] KeymapError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellOptions {
    pub history: HistoryConfig,
}

/// Owns the live editor view from mount until [`EditorShell::unmount`].
#[derive(Debug)]
pub struct EditorShell {
    schema: Schema,
    view: Option<EditorView>,
}

impl EditorShell {
    /// Mount an editor seeded with `seed`.
    ///
    /// `on_change` receives the flattened text after every transaction that
    /// changes the document. Passing `None` is valid.
    ///
    /// # Errors
    ///
    /// Fails if the initial document violates the schema or the keymap
    /// cannot be built.
    pub fn new(
        seed: &str,
        options: ShellOptions,
        on_change: Option<ChangeSink>,
    ) -> Result<Self, ShellError> {
        let schema = Schema::new();
        let doc = Document::from_seed(seed);
        schema.check(&doc)?;

        let state = EditorState::create(doc, options.history);
        let keymap = Keymap::standard()?;
        let view = EditorView::new(state, keymap)
            .with_attribute("data-placeholder", PLACEHOLDER)
            .with_change_sink(on_change);

        info!(
            seed_len = seed.len(),
            bindings = view.keymap().len(),
            history_depth = options.history.depth,
            "editor mounted"
        );
        Ok(Self {
            schema,
            view: Some(view),
        })
    }

    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The live view, or `None` after unmount.
    pub const fn view(&self) -> Option<&EditorView> {
        self.view.as_ref()
    }

    pub const fn view_mut(&mut self) -> Option<&mut EditorView> {
        self.view.as_mut()
    }

    pub const fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    /// Plain-text projection of the current document.
    pub fn flattened_text(&self) -> Option<String> {
        self.view
            .as_ref()
            .map(|view| view.state().doc().flatten_text())
    }

    /// Destroy the view. No callbacks fire afterwards.
    pub fn unmount(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.destroy();
            debug!("editor unmounted");
        }
    }
}
