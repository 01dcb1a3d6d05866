//! Undo/redo history over document snapshots.

use tracing::trace;

use super::model::{Document, Pos};
use super::selection::Selection;
use super::transaction::Transaction;

/// Document and selection captured before a tracked change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub doc: Document,
    pub selection: Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of undo entries kept.
    pub depth: usize,
    /// Adjacent changes closer together than this share one undo entry.
    pub new_group_delay_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: 100,
            new_group_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastChange {
    time_ms: u64,
    end: Pos,
}

/// Undo and redo stacks.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    config: HistoryConfig,
    last_change: Option<LastChange>,
}

impl History {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            config,
            last_change: None,
        }
    }

    /// Record a tracked change. `before` is the state the change started
    /// from; it becomes a new undo entry unless the change continues the
    /// previous group.
    pub fn record(&mut self, before: HistoryEntry, tr: &Transaction) {
        let time_ms = tr.time_ms().unwrap_or(0);
        let grouped = self.last_change.is_some_and(|last| {
            time_ms.saturating_sub(last.time_ms) < self.config.new_group_delay_ms
                && tr.steps().first().is_some_and(|step| step.touches(last.end))
        });

        if grouped {
            trace!(time_ms, "history: change joins current group");
        } else {
            self.undo.push(before);
            if self.undo.len() > self.config.depth {
                self.undo.remove(0);
            }
            trace!(depth = self.undo.len(), "history: new undo entry");
        }
        self.redo.clear();
        self.last_change = tr.maps_content().then(|| LastChange {
            time_ms,
            end: tr.selection().head,
        });
    }

    /// Pop the latest undo entry, pushing `current` onto the redo stack.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        self.last_change = None;
        Some(previous)
    }

    /// Pop the latest redo entry, pushing `current` onto the undo stack.
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        self.last_change = None;
        Some(next)
    }

    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.undo.last()
    }

    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
