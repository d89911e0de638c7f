//! The block editor session.
//!
//! A [`Session`] is constructed once by the host and owns everything the
//! editor knows: every page's blocks, which page is active, the focused
//! block with its caret, and the block-type menu. Hosts feed it input
//! ([`KeyInput`], clicks, pastes) and render from its accessors.
//!
//! - [`keys`]: keyboard command dispatch
//! - [`command`]: toolbar-style commands
//! - [`menu`]: block-type menu state
//! - [`debounce`]: input-triggered save scheduling

pub mod command;
pub mod debounce;
pub mod keys;
pub mod menu;

mod edit;

pub use command::{Command, CommandOutcome};
pub use debounce::{DEFAULT_SAVE_DELAY_MS, SaveDebouncer};
pub use edit::CaretMove;
pub use keys::{Key, KeyAction, KeyInput, KeyOutcome, Modifiers};
pub use menu::MenuState;

use crate::document::{
    Block, BlockData, BlockId, ExportArtifact, Page, default_blocks, export_artifact,
    export_markdown, import_markdown,
};
use crate::store::{DocumentStore, KeyValueStore, MemoryStore, PAGES_KEY};

/// Pages present before anything is loaded.
pub const DEFAULT_PAGES: [&str; 3] = ["main", "notes", "tasks"];

/// Page key for a user-supplied name: trimmed and lowercased, `None` when
/// nothing is left.
fn normalize_page_key(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_lowercase())
}

/// The focused block and the caret inside it.
///
/// Offsets are byte positions in the block's content and always sit on
/// token boundaries (never inside a tag or an entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub block: BlockId,
    pub caret: usize,
    /// Other end of the selection, when one is active.
    pub anchor: Option<usize>,
}

impl Focus {
    pub const fn at(block: BlockId, caret: usize) -> Self {
        Self {
            block,
            caret,
            anchor: None,
        }
    }

    /// Selected byte range, if the selection is non-empty.
    pub fn selection(&self) -> Option<std::ops::Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.caret {
            return None;
        }
        Some(anchor.min(self.caret)..anchor.max(self.caret))
    }
}

/// The block editor controller.
#[derive(Debug)]
pub struct Session {
    pages: Vec<Page>,
    active: usize,
    focus: Option<Focus>,
    menu: MenuState,
    store: Box<dyn KeyValueStore>,
    saver: SaveDebouncer,
    next_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }
}

impl Session {
    /// Create a session over `store` with the default pages, `main` active.
    ///
    /// Nothing is read until [`Session::load`] is called.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            pages: DEFAULT_PAGES.iter().map(|k| Page::from_key(*k)).collect(),
            active: 0,
            focus: None,
            menu: MenuState::Idle,
            store,
            saver: SaveDebouncer::default(),
            next_id: 1,
        }
    }

    /// Use a different quiet period for input-triggered saves.
    #[must_use]
    pub fn with_save_delay(mut self, delay_ms: u64) -> Self {
        self.saver = SaveDebouncer::new(delay_ms);
        self
    }

    /// Make `key` the active page without saving, registering it if needed.
    /// A blank key is ignored.
    ///
    /// Intended for startup, before the first [`Session::load`].
    pub fn set_active_page(&mut self, key: &str) {
        if let Some(key) = normalize_page_key(key) {
            self.active = self.ensure_page(&key);
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn active_page(&self) -> &Page {
        &self.pages[self.active]
    }

    pub fn active_key(&self) -> &str {
        &self.pages[self.active].key
    }

    pub fn blocks(&self) -> &[Block] {
        &self.pages[self.active].blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.active_page().block(id)
    }

    pub const fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn focused_id(&self) -> Option<BlockId> {
        self.focus.map(|f| f.block)
    }

    pub fn focused_block(&self) -> Option<&Block> {
        self.focused_id().and_then(|id| self.block(id))
    }

    pub const fn menu(&self) -> MenuState {
        self.menu
    }

    pub const fn save_pending(&self) -> bool {
        self.saver.is_pending()
    }

    pub fn save_deadline(&self) -> Option<u64> {
        self.saver.deadline()
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.active]
    }

    fn alloc_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    fn build_blocks(&mut self, data: Vec<BlockData>) -> Vec<Block> {
        data.into_iter()
            .map(|d| Block::from_data(self.alloc_id(), d))
            .collect()
    }

    fn ensure_page(&mut self, key: &str) -> usize {
        if let Some(idx) = self.pages.iter().position(|p| p.key == key) {
            return idx;
        }
        self.pages.push(Page::from_key(key));
        self.pages.len() - 1
    }

    // ---- persistence -----------------------------------------------------

    /// The full page map in its persisted form.
    pub fn snapshot(&self) -> DocumentStore {
        let mut doc = DocumentStore::new();
        for page in &self.pages {
            doc.insert(page.key.clone(), page.to_data());
        }
        doc
    }

    /// Write every page to the store. Returns whether the write succeeded;
    /// failures are logged and the in-memory state is kept.
    pub fn save(&mut self) -> bool {
        self.saver.cancel();
        let result = self
            .snapshot()
            .encode()
            .and_then(|text| self.store.set(PAGES_KEY, &text));
        match result {
            Ok(()) => {
                tracing::debug!(page = %self.active_key(), "pages saved");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                false
            }
        }
    }

    fn read_store(&self) -> Option<DocumentStore> {
        let text = match self.store.get(PAGES_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "could not read saved pages");
                return None;
            }
        };
        match DocumentStore::decode(&text) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed saved pages");
                None
            }
        }
    }

    /// Read the store and show the active page.
    ///
    /// Stored pages replace same-named pages in memory; pages that were
    /// never stored are kept. An empty active page is seeded with the
    /// default heading and paragraph.
    pub fn load(&mut self) {
        if let Some(doc) = self.read_store() {
            for (key, data) in doc.into_pages() {
                let blocks = self.build_blocks(data);
                let idx = self.ensure_page(&key);
                self.pages[idx].blocks = blocks;
            }
        }
        if self.blocks().is_empty() {
            let seed = default_blocks(&self.active_page().title);
            let blocks = self.build_blocks(seed);
            self.page_mut().blocks = blocks;
        }
        self.focus = None;
        self.menu = MenuState::Idle;
        tracing::debug!(page = %self.active_key(), blocks = self.blocks().len(), "page loaded");
    }

    /// Record an input event for the debounced save.
    pub const fn note_input(&mut self, now_ms: u64) {
        self.saver.queue(now_ms);
    }

    /// Fire the debounced save if it is due. Returns whether a save ran.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.saver.take_ready(now_ms) {
            self.save();
            true
        } else {
            false
        }
    }

    // ---- pages -----------------------------------------------------------

    /// Activate `key`: save the outgoing page, then load the target.
    ///
    /// An unknown key is registered as a new, empty page. A blank key is
    /// ignored.
    pub fn switch_page(&mut self, key: &str) {
        let Some(key) = normalize_page_key(key) else {
            tracing::debug!("ignored blank page key");
            return;
        };
        self.save();
        self.active = self.ensure_page(&key);
        tracing::info!(page = %key, "switched page");
        self.load();
    }

    /// Create (or revisit) a page named `name` and switch to it.
    ///
    /// Blank names are rejected and leave the page map untouched. Returns
    /// the page key on success.
    pub fn create_page(&mut self, name: &str) -> Option<String> {
        let Some(key) = normalize_page_key(name) else {
            tracing::debug!("rejected blank page name");
            return None;
        };
        let title = name.trim();
        if !self.pages.iter().any(|p| p.key == key) {
            self.pages.push(Page::new(key.clone(), title));
        }
        self.switch_page(&key);
        Some(key)
    }

    // ---- conversions -----------------------------------------------------

    /// The active page as markdown.
    pub fn export_markdown(&self) -> String {
        export_markdown(self.blocks())
    }

    /// Replace the active page's blocks with imported markdown and save.
    ///
    /// Returns the number of imported blocks. Importing nothing seeds the
    /// page's default blocks instead of leaving it empty.
    pub fn import_markdown(&mut self, markdown: &str) -> usize {
        let count = self.replace_with_markdown(markdown);
        self.save();
        count
    }

    /// [`Session::import_markdown`] without the save, for callers that
    /// need the save result.
    pub fn replace_with_markdown(&mut self, markdown: &str) -> usize {
        let data = import_markdown(markdown);
        let count = data.len();
        let data = if data.is_empty() {
            default_blocks(&self.active_page().title)
        } else {
            data
        };
        let blocks = self.build_blocks(data);
        self.page_mut().blocks = blocks;
        self.focus = None;
        self.menu = MenuState::Idle;
        count
    }

    /// The `<page>-content.html` artifact for the active page.
    pub fn export_artifact(&self) -> ExportArtifact {
        export_artifact(self.active_page())
    }
}
