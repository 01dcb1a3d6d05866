use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use ratatui::layout::Rect;
use tracing::info;

use crate::editor::MarkSet;
use crate::shell::{EditorShell, ShellError, ShellOptions};
use crate::toolbar::Toolbar;
use crate::ui::AppLayout;
use crate::ui::wrap::{VisualLine, visual_position, wrap_document};

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The mounted editor
    pub shell: EditorShell,
    /// Formatting toolbar, attached to the shell's view
    pub toolbar: Toolbar,
    /// Latest flattened text delivered by the change callback
    preview: Rc<RefCell<String>>,
    /// Number of content changes reported so far
    change_count: Rc<Cell<usize>>,
    /// Whether the plain-text preview pane is shown
    pub preview_visible: bool,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// First wrapped editor row on screen
    pub scroll_offset: usize,
    /// Terminal size (width, height)
    pub terminal_size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("mounted", &self.shell.is_mounted())
            .field("preview_visible", &self.preview_visible)
            .field("help_visible", &self.help_visible)
            .field("scroll_offset", &self.scroll_offset)
            .field("change_count", &self.change_count.get())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Mount the editor for `seed` and attach the toolbar.
    ///
    /// # Errors
    ///
    /// Fails if the editor cannot be mounted.
    pub fn new(
        seed: &str,
        options: ShellOptions,
        terminal_size: (u16, u16),
    ) -> Result<Self, ShellError> {
        let preview = Rc::new(RefCell::new(String::new()));
        let change_count = Rc::new(Cell::new(0));

        let sink_preview = Rc::clone(&preview);
        let sink_count = Rc::clone(&change_count);
        let mut shell = EditorShell::new(
            seed,
            options,
            Some(Box::new(move |text: &str| {
                *sink_preview.borrow_mut() = text.to_string();
                sink_count.set(sink_count.get() + 1);
            })),
        )?;
        if let Some(text) = shell.flattened_text() {
            *preview.borrow_mut() = text;
        }

        let mut toolbar = Toolbar::new();
        if let Some(view) = shell.view_mut() {
            toolbar.attach(view);
        }

        Ok(Self {
            shell,
            toolbar,
            preview,
            change_count,
            preview_visible: true,
            help_visible: false,
            scroll_offset: 0,
            terminal_size,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
        })
    }

    /// Latest plain-text projection reported by the editor.
    pub fn preview_text(&self) -> String {
        self.preview.borrow().clone()
    }

    pub fn change_count(&self) -> usize {
        self.change_count.get()
    }

    pub fn active_marks(&self) -> MarkSet {
        self.toolbar.active_marks()
    }

    /// Screen regions for the current terminal size.
    pub fn layout(&self) -> AppLayout {
        let (width, height) = self.terminal_size;
        crate::ui::layout(Rect::new(0, 0, width, height), self.preview_visible)
    }

    /// The document wrapped to the editor's text width.
    pub fn wrapped_lines(&self) -> Vec<VisualLine> {
        let width = self.layout().editor_content.width;
        self.shell
            .view()
            .map(|view| wrap_document(view.state().doc(), width))
            .unwrap_or_default()
    }

    /// Scroll so the selection head is on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let Some(view) = self.shell.view() else {
            return;
        };
        let lines = self.wrapped_lines();
        let height = usize::from(self.layout().editor_content.height).max(1);
        let (row, _) = visual_position(view.state().doc(), &lines, view.state().selection().head);

        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + height {
            self.scroll_offset = row + 1 - height;
        }
        self.clamp_scroll(lines.len());
    }

    pub(super) fn clamp_scroll(&mut self, total_rows: usize) {
        let height = usize::from(self.layout().editor_content.height).max(1);
        self.scroll_offset = self.scroll_offset.min(total_rows.saturating_sub(height));
    }

    /// Detach the toolbar and destroy the view. Safe to call twice.
    pub fn teardown(&mut self) {
        self.toolbar.detach(self.shell.view_mut());
        if self.shell.is_mounted() {
            self.shell.unmount();
            info!(changes = self.change_count(), "editor closed");
        }
    }
}
