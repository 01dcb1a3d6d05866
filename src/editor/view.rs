//! The live editor view: owns the current state and is the only dispatch
//! path for transactions.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, warn};

use super::commands::{self, EditorCommand};
use super::keymap::{KeyChord, Keymap};
use super::state::EditorState;
use super::transaction::Transaction;

/// Receives the flattened text after every content-changing transaction.
pub type ChangeSink = Box<dyn FnMut(&str)>;

/// Receives the new state after every dispatched transaction.
pub type Listener = Box<dyn FnMut(&EditorState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct EditorView {
    state: EditorState,
    keymap: Keymap,
    attributes: BTreeMap<String, String>,
    on_change: Option<ChangeSink>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
    clock: Instant,
    destroyed: bool,
}

impl EditorView {
    pub fn new(state: EditorState, keymap: Keymap) -> Self {
        Self {
            state,
            keymap,
            attributes: BTreeMap::new(),
            on_change: None,
            listeners: Vec::new(),
            next_listener_id: 0,
            clock: Instant::now(),
            destroyed: false,
        }
    }

    /// Set a surface attribute (e.g. `data-placeholder`).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_change_sink(mut self, sink: Option<ChangeSink>) -> Self {
        self.on_change = sink;
        self
    }

    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub const fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Apply `tr`, forward the flattened text if the document changed, then
    /// notify listeners. Ignored once the view is destroyed.
    pub fn dispatch(&mut self, tr: Transaction) {
        if self.destroyed {
            warn!("dispatch after destroy ignored");
            return;
        }
        let tr = match tr.time_ms() {
            Some(_) => tr,
            None => tr.with_time(self.now_ms()),
        };
        let doc_changed = tr.doc_changed();

        let previous = std::mem::take(&mut self.state);
        self.state = previous.apply(tr);

        if doc_changed && let Some(sink) = self.on_change.as_mut() {
            let text = self.state.doc().flatten_text();
            debug!(len = text.len(), "forwarding flattened text");
            sink(&text);
        }
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Run a command against the current state. Returns `false` when the
    /// command did not apply.
    pub fn run(&mut self, command: &EditorCommand) -> bool {
        if self.destroyed {
            return false;
        }
        match commands::execute(&self.state, command) {
            Some(tr) => {
                self.dispatch(tr);
                true
            }
            None => false,
        }
    }

    /// Run the command bound to `chord`, if any.
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        let Some(command) = self.keymap.lookup(chord).cloned() else {
            return false;
        };
        self.run(&command);
        true
    }

    /// Register a state listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Release listeners and the change sink. Later dispatches are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        debug!(listeners = self.listeners.len(), "destroying editor view");
        self.listeners.clear();
        self.on_change = None;
        self.destroyed = true;
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl std::fmt::Debug for EditorView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorView")
            .field("state", &self.state)
            .field("attributes", &self.attributes)
            .field("listeners", &self.listeners.len())
            .field("has_change_sink", &self.on_change.is_some())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
