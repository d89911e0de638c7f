//! Block document model and conversions.
//!
//! This module handles:
//! - Block, page and block-type types
//! - Inline markup carried by block content
//! - Markdown import/export
//! - Editor markup for the HTML export artifact

pub mod html;
pub mod inline;
pub mod markdown;
mod types;

pub use html::{ExportArtifact, export_artifact, page_markup};
pub use markdown::{export_markdown, import_markdown};
pub use types::{
    Block, BlockData, BlockId, BlockType, MAX_LEVEL, Page, UnknownBlockType, capitalize,
    default_blocks,
};
