//! Line-oriented markdown conversion.
//!
//! Export maps each block to a prefix rule over its text content. Import is
//! the inverse on a best-effort basis: every line is classified by a fixed
//! prefix priority and blank lines are dropped. Nested lists, multi-line
//! fences and inline formatting are not modelled.

use super::{BlockData, BlockType};
use crate::document::inline::plain_text;
use crate::document::Block;

/// Prefixes recognised on import, in priority order.
const IMPORT_RULES: [(&str, BlockType); 6] = [
    ("# ", BlockType::Heading1),
    ("## ", BlockType::Heading2),
    ("### ", BlockType::Heading3),
    ("- ", BlockType::BulletedItem),
    ("1. ", BlockType::NumberedItem),
    ("> ", BlockType::Quote),
];

/// Render a single block type and its text content as markdown.
pub fn block_to_markdown(block_type: BlockType, text: &str) -> String {
    match block_type {
        BlockType::Heading1 => format!("# {text}\n\n"),
        BlockType::Heading2 => format!("## {text}\n\n"),
        BlockType::Heading3 => format!("### {text}\n\n"),
        BlockType::BulletedItem => format!("- {text}\n"),
        BlockType::NumberedItem => format!("1. {text}\n"),
        BlockType::Quote => format!("> {text}\n\n"),
        BlockType::Code => format!("```\n{text}\n```\n\n"),
        BlockType::Paragraph => format!("{text}\n\n"),
    }
}

/// Export blocks as markdown, using each block's text content.
pub fn export_markdown(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| block_to_markdown(block.block_type, &plain_text(&block.content)))
        .collect()
}

/// Classify one line of markdown, or `None` for a blank line.
pub fn classify_line(line: &str) -> Option<BlockData> {
    for (prefix, block_type) in IMPORT_RULES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some(BlockData::new(block_type, rest));
        }
    }
    if line.trim().is_empty() {
        None
    } else {
        Some(BlockData::new(BlockType::Paragraph, line))
    }
}

/// Import markdown text as an ordered list of blocks.
pub fn import_markdown(markdown: &str) -> Vec<BlockData> {
    markdown.split('\n').filter_map(classify_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockId;

    fn block(block_type: BlockType, content: &str) -> Block {
        Block::from_data(BlockId(0), BlockData::new(block_type, content))
    }

    #[test]
    fn test_heading_exports_with_blank_line() {
        assert_eq!(export_markdown(&[block(BlockType::Heading1, "Title")]), "# Title\n\n");
    }

    #[test]
    fn test_heading_import_strips_prefix() {
        let blocks = import_markdown("# Title\n\n");
        assert_eq!(blocks, vec![BlockData::new(BlockType::Heading1, "Title")]);
    }

    #[test]
    fn test_export_uses_text_content() {
        let md = export_markdown(&[block(BlockType::Paragraph, "a <b>bold</b> &amp; b")]);
        assert_eq!(md, "a bold & b\n\n");
    }

    #[test]
    fn test_export_every_type() {
        let blocks = vec![
            block(BlockType::Heading2, "Two"),
            block(BlockType::Heading3, "Three"),
            block(BlockType::BulletedItem, "bullet"),
            block(BlockType::NumberedItem, "number"),
            block(BlockType::Quote, "quoted"),
            block(BlockType::Code, "let x = 1;"),
            block(BlockType::Paragraph, "plain"),
        ];
        let expected = "## Two\n\n### Three\n\n- bullet\n1. number\n> quoted\n\n```\nlet x = 1;\n```\n\nplain\n\n";
        assert_eq!(export_markdown(&blocks), expected);
    }

    #[test]
    fn test_import_prefix_priority() {
        let blocks = import_markdown("## Sub\n### Deep\n- a\n1. b\n> c\nplain text\n#nospace");
        let types: Vec<_> = blocks.iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Heading2,
                BlockType::Heading3,
                BlockType::BulletedItem,
                BlockType::NumberedItem,
                BlockType::Quote,
                BlockType::Paragraph,
                BlockType::Paragraph,
            ]
        );
        assert_eq!(blocks[6].content, "#nospace");
    }

    #[test]
    fn test_import_skips_blank_lines_and_keeps_paragraph_verbatim() {
        let blocks = import_markdown("\n   \n  indented line \n\n");
        assert_eq!(blocks, vec![BlockData::new(BlockType::Paragraph, "  indented line ")]);
    }

    #[test]
    fn test_code_fence_imports_literally() {
        let blocks = import_markdown("```\nfn main() {}\n```\n");
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.block_type == BlockType::Paragraph));
        assert_eq!(blocks[0].content, "```");
    }

    #[test]
    fn test_inline_markup_is_kept_as_raw_characters() {
        let blocks = import_markdown("- **bold** <i>x</i>");
        assert_eq!(blocks[0].content, "**bold** <i>x</i>");
    }

    #[test]
    fn test_numbered_items_are_not_renumbered() {
        let blocks = import_markdown("1. one\n2. two");
        assert_eq!(blocks[0].block_type, BlockType::NumberedItem);
        assert_eq!(blocks[1].block_type, BlockType::Paragraph);
        assert_eq!(blocks[1].content, "2. two");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn round_trippable_type() -> impl Strategy<Value = BlockType> {
            prop::sample::select(vec![
                BlockType::Paragraph,
                BlockType::Heading1,
                BlockType::Heading2,
                BlockType::Heading3,
                BlockType::BulletedItem,
                BlockType::NumberedItem,
                BlockType::Quote,
            ])
        }

        // Single-line text that no import prefix can claim when it
        // appears as paragraph content.
        fn content() -> impl Strategy<Value = String> {
            "[A-Za-z][A-Za-z0-9 ,.!?]{0,30}"
        }

        proptest! {
            #[test]
            fn import_reverses_export(
                items in prop::collection::vec((round_trippable_type(), content()), 0..20)
            ) {
                let blocks: Vec<Block> = items
                    .iter()
                    .map(|(ty, text)| block(*ty, text))
                    .collect();
                let imported = import_markdown(&export_markdown(&blocks));
                let expected: Vec<BlockData> = items
                    .into_iter()
                    .map(|(ty, text)| BlockData::new(ty, text))
                    .collect();
                prop_assert_eq!(imported, expected);
            }
        }
    }
}
