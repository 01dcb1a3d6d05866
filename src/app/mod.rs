//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions, driving the editor view
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use input::key_chord;
pub use model::Model;
pub use update::{Message, update};

use std::path::PathBuf;

use crate::editor::HistoryConfig;
use crate::shell::ShellOptions;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    seed: String,
    options: ShellOptions,
    preview_visible: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application seeded with `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            options: ShellOptions::default(),
            preview_visible: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Override undo history depth and grouping.
    pub const fn with_history(mut self, history: HistoryConfig) -> Self {
        self.options.history = history;
        self
    }

    /// Show or hide the plain-text preview pane.
    pub const fn with_preview(mut self, visible: bool) -> Self {
        self.preview_visible = visible;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
