//! Editor markup for the HTML export artifact.

use super::Page;

/// A file the host should hand to the user (download, write to disk, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

/// Render a page's blocks as editor markup, content included verbatim.
pub fn page_markup(page: &Page) -> String {
    let mut out = String::new();
    for block in &page.blocks {
        out.push_str("<div class=\"block\" data-type=\"");
        out.push_str(block.block_type.tag());
        out.push('"');
        if block.level > 0 {
            out.push_str(&format!(" data-level=\"{}\"", block.level));
        }
        out.push_str("><div class=\"block-content\" contenteditable=\"true\">");
        out.push_str(&block.content);
        out.push_str("</div></div>\n");
    }
    out
}

/// Build the `<page>-content.html` export for a page.
pub fn export_artifact(page: &Page) -> ExportArtifact {
    ExportArtifact {
        file_name: format!("{}-content.html", page.key),
        contents: page_markup(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, BlockData, BlockId, BlockType};

    #[test]
    fn test_export_artifact_is_named_after_page() {
        let mut page = Page::from_key("notes");
        page.blocks.push(Block::from_data(
            BlockId(1),
            BlockData::new(BlockType::Heading1, "Hi <b>there</b>"),
        ));
        let artifact = export_artifact(&page);
        assert_eq!(artifact.file_name, "notes-content.html");
        assert_eq!(
            artifact.contents,
            "<div class=\"block\" data-type=\"h1\"><div class=\"block-content\" contenteditable=\"true\">Hi <b>there</b></div></div>\n"
        );
    }

    #[test]
    fn test_nested_blocks_carry_level() {
        let mut page = Page::from_key("main");
        let mut data = BlockData::new(BlockType::BulletedItem, "child");
        data.level = 2;
        page.blocks.push(Block::from_data(BlockId(1), data));
        assert!(page_markup(&page).contains("data-type=\"ul\" data-level=\"2\">"));
    }
}
