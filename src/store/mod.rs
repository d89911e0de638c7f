//! Persistence of the page map.
//!
//! The editor writes the whole page map as one JSON document into a single
//! slot of a [`KeyValueStore`]. Stores only ever see opaque strings; the
//! [`DocumentStore`] codec is the only place that knows the layout.

mod codec;
mod file;
mod memory;

pub use codec::DocumentStore;
pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use thiserror::Error;

/// Slot holding the serialized page map.
pub const PAGES_KEY: &str = "notion-editor-pages";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid store key `{0}`")]
    InvalidKey(String),

    #[error("malformed document store: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A durable string-to-string slot store.
pub trait KeyValueStore: std::fmt::Debug {
    /// Read a slot. A missing slot is `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace a slot's value.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}
