// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # Blocknote
//!
//! A block-based note editor for the terminal.
//!
//! Notes are organised as pages of typed blocks:
//! - Paragraphs, three heading levels, bulleted and numbered items,
//!   quotes and code
//! - Inline bold, italic and underline
//! - Debounced saves of every page into a key-value store
//! - Markdown import/export and an HTML share artifact
//!
//! ## Architecture
//!
//! The editor core ([`session`]) is host-neutral: it takes key, click
//! and paste input and exposes the blocks to render. The terminal host
//! ([`app`]) uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`config`]: rc-file defaults
//! - [`document`]: Blocks, pages, inline markup and conversions
//! - [`session`]: The block editor controller
//! - [`store`]: Key-value persistence
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod session;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Block, BlockData, BlockType, Page};
    pub use crate::session::{Command, Key, KeyInput, KeyOutcome, Session};
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
}
