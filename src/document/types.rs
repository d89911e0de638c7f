//! Core block and page types.

use std::fmt;
use std::str::FromStr;

/// Deepest nesting level reachable through indentation.
pub const MAX_LEVEL: u8 = 8;

/// Session-unique identifier of a block.
///
/// Identifiers are not persisted; blocks get fresh ids every time a page
/// is loaded from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a block. Storage tags match the editor markup's `data-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedItem,
    NumberedItem,
    Quote,
    Code,
}

impl BlockType {
    /// Every block type, in block-menu order.
    pub const ALL: [Self; 8] = [
        Self::Paragraph,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::BulletedItem,
        Self::NumberedItem,
        Self::Quote,
        Self::Code,
    ];

    /// Tag used in persisted data and exported markup.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::BulletedItem => "ul",
            Self::NumberedItem => "ol",
            Self::Quote => "quote",
            Self::Code => "code",
        }
    }

    /// Look up a type by its storage tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    /// Human readable label shown in the block menu.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paragraph => "Text",
            Self::Heading1 => "Heading 1",
            Self::Heading2 => "Heading 2",
            Self::Heading3 => "Heading 3",
            Self::BulletedItem => "Bulleted list",
            Self::NumberedItem => "Numbered list",
            Self::Quote => "Quote",
            Self::Code => "Code",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when parsing an unknown block tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type `{0}`")]
pub struct UnknownBlockType(pub String);

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

/// Block payload without identity: what gets persisted and what markdown
/// import produces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockData {
    pub block_type: BlockType,
    pub content: String,
    pub level: u8,
}

impl BlockData {
    pub fn new(block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            block_type,
            content: content.into(),
            level: 0,
        }
    }
}

/// A block inside a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    /// Markup-bearing text (inline tags and entities allowed).
    pub content: String,
    /// Nesting level adjusted by indent/outdent.
    pub level: u8,
}

impl Block {
    pub fn from_data(id: BlockId, data: BlockData) -> Self {
        Self {
            id,
            block_type: data.block_type,
            content: data.content,
            level: data.level.min(MAX_LEVEL),
        }
    }

    pub fn to_data(&self) -> BlockData {
        BlockData {
            block_type: self.block_type,
            content: self.content.clone(),
            level: self.level,
        }
    }

    /// Text content with markup removed.
    pub fn plain_text(&self) -> String {
        super::inline::plain_text(&self.content)
    }

    /// A block is empty when its text content is blank after trimming.
    pub fn is_empty(&self) -> bool {
        super::inline::is_blank(&self.content)
    }
}

/// A named, ordered collection of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Lowercase identifier, used as the key in the document store.
    pub key: String,
    /// Display name shown in the sidebar.
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Create a page whose title is derived from its key.
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let title = capitalize(&key);
        Self::new(key, title)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn to_data(&self) -> Vec<BlockData> {
        self.blocks.iter().map(Block::to_data).collect()
    }
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Blocks shown on a page that has nothing stored yet.
pub fn default_blocks(title: &str) -> Vec<BlockData> {
    vec![
        BlockData::new(BlockType::Heading1, format!("Welcome to {title}")),
        BlockData::new(
            BlockType::Paragraph,
            "Start typing to create your content...",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_for_every_type() {
        for ty in BlockType::ALL {
            assert_eq!(BlockType::from_tag(ty.tag()), Some(ty));
            assert_eq!(ty.tag().parse::<BlockType>(), Ok(ty));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert_eq!(BlockType::from_tag("h4"), None);
        assert!("table".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("main"), "Main");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn test_default_blocks_greet_the_page() {
        let blocks = default_blocks("Notes");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_type, BlockType::Heading1);
        assert_eq!(blocks[0].content, "Welcome to Notes");
        assert_eq!(blocks[1].block_type, BlockType::Paragraph);
    }

    #[test]
    fn test_from_data_clamps_level() {
        let mut data = BlockData::new(BlockType::Quote, "x");
        data.level = 200;
        let block = Block::from_data(BlockId(1), data);
        assert_eq!(block.level, MAX_LEVEL);
    }

    #[test]
    fn test_markup_only_block_is_empty() {
        let block = Block::from_data(BlockId(1), BlockData::new(BlockType::Paragraph, "<b> </b>"));
        assert!(block.is_empty());
    }
}
