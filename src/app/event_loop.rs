use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{App, Message, Model, update};

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, mounting the editor,
    /// or the event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; richpad requires an interactive terminal")?;
        let size = terminal.size()?;

        // Lets Ctrl-I arrive as Ctrl-I instead of Tab where supported.
        let enhanced_keys = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )?;
        }
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!(
            width = size.width,
            height = size.height,
            enhanced_keys,
            "terminal ready"
        );

        let result = Model::new(&self.seed, self.options, (size.width, size.height))
            .context("Failed to mount editor")
            .and_then(|mut model| {
                model.preview_visible = self.preview_visible;
                model
                    .config_global_path
                    .clone_from(&self.config_global_path);
                model.config_local_path.clone_from(&self.config_local_path);
                Self::event_loop(&mut terminal, model)
            });

        // Restore terminal
        if enhanced_keys {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, mut model: Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(50);
        let mut needs_render = true;

        loop {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                debug!(width, height, "resize applied");
                model = update(model, Message::Resize(width, height));
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(&model, frame))?;
                needs_render = false;
            }

            let poll_ms = if resize_debouncer.is_pending() { 10 } else { 250 };
            if !event::poll(Duration::from_millis(poll_ms))? {
                continue;
            }

            // Coalesce bursts (key repeat, paste) into a single render.
            loop {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let event = event::read()?;
                if let Some(msg) =
                    Self::handle_event(&event, &model, event_ms, &mut resize_debouncer)
                {
                    model = update(model, msg);
                    needs_render = true;
                }
                if model.should_quit || !event::poll(Duration::from_millis(0))? {
                    break;
                }
            }

            if model.should_quit {
                break;
            }
        }

        model.teardown();
        Ok(())
    }
}
