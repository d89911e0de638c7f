//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::session::DEFAULT_SAVE_DELAY_MS;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    store_dir: PathBuf,
    page: Option<String>,
    export_dir: PathBuf,
    debounce_ms: u64,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application persisting into `store_dir`.
    pub fn new(store_dir: PathBuf) -> Self {
        Self {
            store_dir,
            page: None,
            export_dir: PathBuf::from("."),
            debounce_ms: DEFAULT_SAVE_DELAY_MS,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Open `page` instead of the first page.
    #[must_use]
    pub fn with_page(mut self, page: Option<String>) -> Self {
        self.page = page;
        self
    }

    /// Directory share artifacts are written into.
    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// Quiet period before input triggers a save.
    #[must_use]
    pub const fn with_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.debounce_ms = delay_ms;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
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

#[cfg(test)]
mod tests;
