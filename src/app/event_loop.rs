use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::session::Session;
use crate::store::FileStore;

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
    /// Open the store, load the pages and run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let session = self.open_session();

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - blocknote requires an interactive terminal")?;
        let size = terminal.size()?;
        tracing::debug!(width = size.width, height = size.height, "terminal ready");

        let mut model = Model::new(session, (size.width, size.height))
            .with_export_dir(self.export_dir.clone());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        let result = Self::event_loop(&mut terminal, &mut model);

        // Flush anything still waiting on the debounce timer.
        if model.session.save_pending() && !model.session.save() {
            tracing::warn!("final save failed");
        }

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// Build the session over the configured store directory.
    pub(super) fn open_session(&self) -> Session {
        let store = FileStore::new(self.store_dir.clone());
        let mut session = Session::new(Box::new(store)).with_save_delay(self.debounce_ms);
        if let Some(page) = &self.page {
            session.set_active_page(page);
        }
        session.load();
        session.focus_first();
        tracing::info!(
            store = %self.store_dir.display(),
            page = session.active_key(),
            pages = session.pages().len(),
            "session loaded"
        );
        session
    }

    pub(super) fn dispatch(model: &mut Model, msg: Message, now_ms: u64) {
        tracing::trace!(?msg, "message");
        let edit = msg.is_edit();
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        if edit {
            model.session.note_input(now_ms);
        }
        Self::handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = elapsed_ms();

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                tracing::debug!(width, height, "resize applied");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            // The status bar drops its [modified] marker once this fires.
            if model.session.tick(now_ms) {
                needs_render = true;
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                model
                    .session
                    .save_deadline()
                    .map_or(250, |deadline| deadline.saturating_sub(now_ms).clamp(1, 250))
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = elapsed_ms();
                if let Some(msg) =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    Self::dispatch(model, msg, event_ms);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = elapsed_ms();
                    if let Some(msg) =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        drained += 1;
                        Self::dispatch(model, msg, drain_ms);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    tracing::trace!(drained, "event burst coalesced");
                }
            }

            if needs_render {
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
