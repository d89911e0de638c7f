use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::document::{BlockData, BlockType, MAX_LEVEL};

use super::StoreError;

/// Persisted form of one block: `{"type": "h1", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredBlock {
    #[serde(rename = "type", default = "paragraph_tag")]
    block_type: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    level: u8,
}

fn paragraph_tag() -> String {
    BlockType::Paragraph.tag().to_string()
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(level: &u8) -> bool {
    *level == 0
}

impl From<&BlockData> for StoredBlock {
    fn from(data: &BlockData) -> Self {
        Self {
            block_type: data.block_type.tag().to_string(),
            content: data.content.clone(),
            level: data.level,
        }
    }
}

impl From<StoredBlock> for BlockData {
    fn from(stored: StoredBlock) -> Self {
        let block_type = BlockType::from_tag(&stored.block_type).unwrap_or_else(|| {
            tracing::warn!(tag = %stored.block_type, "unknown block type in store, using paragraph");
            BlockType::Paragraph
        });
        Self {
            block_type,
            content: stored.content,
            level: stored.level.min(MAX_LEVEL),
        }
    }
}

/// The full page map as persisted: page key to ordered blocks.
///
/// Serializes as a JSON object whose member order follows page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStore {
    pages: Vec<(String, Vec<BlockData>)>,
}

impl DocumentStore {
    pub const fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Set a page's blocks, keeping its position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, blocks: Vec<BlockData>) {
        let key = key.into();
        if let Some(slot) = self.pages.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = blocks;
        } else {
            self.pages.push((key, blocks));
        }
    }

    pub fn get(&self, key: &str) -> Option<&[BlockData]> {
        self.pages
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, blocks)| blocks.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|(k, _)| k.as_str())
    }

    pub fn into_pages(self) -> Vec<(String, Vec<BlockData>)> {
        self.pages
    }

    /// Serialize to the stored JSON text.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse stored JSON text.
    ///
    /// # Errors
    /// Returns [`StoreError::Malformed`] when the text is not a page map.
    pub fn decode(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Serialize for DocumentStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for (key, blocks) in &self.pages {
            let stored: Vec<StoredBlock> = blocks.iter().map(StoredBlock::from).collect();
            map.serialize_entry(key, &stored)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PagesVisitor;

        impl<'de> Visitor<'de> for PagesVisitor {
            type Value = DocumentStore;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of page names to block lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut store = DocumentStore::new();
                while let Some((key, blocks)) = access.next_entry::<String, Vec<StoredBlock>>()? {
                    store.insert(key, blocks.into_iter().map(BlockData::from).collect());
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(PagesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_editor_layout() {
        let mut store = DocumentStore::new();
        store.insert("main", vec![BlockData::new(BlockType::Heading1, "Hi")]);
        store.insert("notes", Vec::new());
        assert_eq!(
            store.encode().unwrap(),
            r#"{"main":[{"type":"h1","content":"Hi"}],"notes":[]}"#
        );
    }

    #[test]
    fn test_decode_preserves_page_order() {
        let store =
            DocumentStore::decode(r#"{"tasks":[],"main":[{"type":"p","content":"x"}],"b":[]}"#)
                .unwrap();
        let keys: Vec<_> = store.keys().collect();
        assert_eq!(keys, vec!["tasks", "main", "b"]);
        assert_eq!(store.get("main").unwrap()[0].content, "x");
    }

    #[test]
    fn test_unknown_type_decodes_as_paragraph() {
        let store = DocumentStore::decode(r#"{"main":[{"type":"table","content":"x"}]}"#).unwrap();
        assert_eq!(store.get("main").unwrap()[0].block_type, BlockType::Paragraph);
        let reencoded = store.encode().unwrap();
        assert!(reencoded.contains(r#""type":"p""#));
    }

    #[test]
    fn test_level_round_trips_only_when_set() {
        let mut data = BlockData::new(BlockType::BulletedItem, "child");
        data.level = 3;
        let mut store = DocumentStore::new();
        store.insert("main", vec![data.clone(), BlockData::new(BlockType::Paragraph, "top")]);
        let text = store.encode().unwrap();
        assert!(text.contains(r#""level":3"#));
        assert_eq!(text.matches("level").count(), 1);
        assert_eq!(DocumentStore::decode(&text).unwrap().get("main").unwrap()[0], data);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(DocumentStore::decode("not json").is_err());
        assert!(DocumentStore::decode("[1, 2]").is_err());
        assert!(DocumentStore::decode(r#"{"main": 5}"#).is_err());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut store = DocumentStore::new();
        store.insert("a", Vec::new());
        store.insert("b", Vec::new());
        store.insert("a", vec![BlockData::default()]);
        let keys: Vec<_> = store.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().len(), 1);
    }
}
