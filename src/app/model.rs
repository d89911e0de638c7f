use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::document::ExportArtifact;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. Editor state
/// proper (pages, blocks, focus, block menu) is owned by the [`Session`].
#[derive(Debug)]
pub struct Model {
    /// The block editor session
    pub session: Session,
    /// Terminal size (columns, rows)
    pub terminal_size: (u16, u16),
    /// Index of the first block row shown in the editor pane
    pub scroll_offset: usize,
    /// Directory share artifacts are written into
    pub export_dir: PathBuf,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Page name being typed into the new-page prompt
    pub page_prompt: Option<String>,
    /// Artifact waiting to be written by the effects layer
    pub(super) pending_export: Option<ExportArtifact>,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl Model {
    pub fn new(session: Session, terminal_size: (u16, u16)) -> Self {
        Self {
            session,
            terminal_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    pub const fn prompt_active(&self) -> bool {
        self.page_prompt.is_some()
    }

    /// Position of the active page in the sidebar.
    pub fn active_page_index(&self) -> usize {
        let key = self.session.active_key();
        self.session
            .pages()
            .iter()
            .position(|p| p.key == key)
            .unwrap_or_default()
    }

    /// Key of the page `delta` steps away from the active one, wrapping.
    pub(super) fn neighbour_page(&self, delta: isize) -> Option<String> {
        let pages = self.session.pages();
        if pages.len() < 2 {
            return None;
        }
        let len = pages.len();
        let current = self.active_page_index();
        let step = delta.unsigned_abs() % len;
        let idx = if delta < 0 {
            (current + len - step) % len
        } else {
            (current + step) % len
        };
        Some(pages[idx].key.clone())
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(3),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            session: Session::default(),
            terminal_size: (80, 24),
            scroll_offset: 0,
            export_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            page_prompt: None,
            pending_export: None,
            toast: None,
            should_quit: false,
        }
    }
}
