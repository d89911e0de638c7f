//! Block mutations and caret-level editing.

use crate::document::inline::{self, Format};
use crate::document::{Block, BlockData, BlockId, BlockType, MAX_LEVEL};

use super::{Focus, MenuState, Session};

/// Caret movement within the focused block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    Home,
    End,
}

impl Session {
    /// Block directly before `id` on the active page.
    pub fn previous_block(&self, id: BlockId) -> Option<BlockId> {
        let idx = self.active_page().position(id)?;
        idx.checked_sub(1).map(|prev| self.blocks()[prev].id)
    }

    /// Block directly after `id` on the active page.
    pub fn next_block(&self, id: BlockId) -> Option<BlockId> {
        let idx = self.active_page().position(id)?;
        self.blocks().get(idx + 1).map(|b| b.id)
    }

    /// Whether a block has no text content. Unknown blocks count as empty.
    pub fn is_block_empty(&self, id: BlockId) -> bool {
        self.block(id).is_none_or(Block::is_empty)
    }

    /// Insert an empty paragraph after `after` (or at the end when `None`
    /// or unknown) and focus it.
    pub fn create_block(&mut self, after: Option<BlockId>) -> BlockId {
        let id = self.alloc_id();
        let block = Block::from_data(id, BlockData::new(BlockType::Paragraph, ""));
        let position = after.and_then(|a| self.active_page().position(a));
        let page = self.page_mut();
        match position {
            Some(idx) => page.blocks.insert(idx + 1, block),
            None => page.blocks.push(block),
        }
        self.focus_block(id);
        tracing::debug!(block = %id, "block created");
        id
    }

    /// Remove a block from the active page. Unknown ids are ignored.
    pub fn delete_block(&mut self, id: BlockId) -> bool {
        let Some(idx) = self.active_page().position(id) else {
            return false;
        };
        self.page_mut().blocks.remove(idx);
        if self.focused_id() == Some(id) {
            self.focus = None;
        }
        if self.menu.anchor() == Some(id) {
            self.menu = MenuState::Idle;
        }
        tracing::debug!(block = %id, "block deleted");
        true
    }

    /// Focus a block with the caret collapsed at the end of its content.
    pub fn focus_block(&mut self, id: BlockId) -> bool {
        let Some(block) = self.block(id) else {
            return false;
        };
        self.focus = Some(Focus::at(id, block.content.len()));
        true
    }

    /// Focus the first block of the page, if any.
    pub fn focus_first(&mut self) -> bool {
        match self.blocks().first().map(|b| b.id) {
            Some(id) => self.focus_block(id),
            None => false,
        }
    }

    /// Change the focused block's type. Content is left untouched and the
    /// block keeps focus.
    pub fn change_block_type(&mut self, block_type: BlockType) -> bool {
        let Some(id) = self.focused_id() else {
            return false;
        };
        self.set_block_type(id, block_type)
    }

    /// Change a specific block's type and focus it.
    pub fn set_block_type(&mut self, id: BlockId, block_type: BlockType) -> bool {
        let Some(block) = self.page_mut().block_mut(id) else {
            return false;
        };
        block.block_type = block_type;
        self.focus_block(id)
    }

    pub fn indent_block(&mut self, id: BlockId) -> bool {
        self.adjust_level(id, |level| level.saturating_add(1).min(MAX_LEVEL))
    }

    pub fn outdent_block(&mut self, id: BlockId) -> bool {
        self.adjust_level(id, |level| level.saturating_sub(1))
    }

    fn adjust_level(&mut self, id: BlockId, f: impl FnOnce(u8) -> u8) -> bool {
        let Some(block) = self.page_mut().block_mut(id) else {
            return false;
        };
        let next = f(block.level);
        let changed = next != block.level;
        block.level = next;
        changed
    }

    // ---- block menu ------------------------------------------------------

    /// Open the block-type menu below `anchor`.
    pub fn open_menu(&mut self, anchor: BlockId) {
        self.menu = MenuState::Open {
            anchor,
            selected: 0,
        };
    }

    pub const fn hide_menu(&mut self) {
        self.menu = MenuState::Idle;
    }

    pub(super) fn step_menu(&mut self, delta: isize) {
        self.menu.step(delta);
    }

    /// Apply a type from the menu to the anchored block and close the menu.
    pub fn select_menu_type(&mut self, block_type: BlockType) -> bool {
        let target = self.menu.anchor().or_else(|| self.focused_id());
        self.menu = MenuState::Idle;
        target.is_some_and(|id| self.set_block_type(id, block_type))
    }

    // ---- pointer ---------------------------------------------------------

    /// A click inside the editing surface: closes the menu and moves focus
    /// to `id`, with the caret at `caret` (or the end) when given.
    pub fn click_block(&mut self, id: BlockId, caret: Option<usize>) {
        self.hide_menu();
        let Some(block) = self.block(id) else {
            return;
        };
        let caret = caret.map_or(block.content.len(), |c| inline::snap(&block.content, c));
        self.focus = Some(Focus::at(id, caret));
    }

    /// A click anywhere outside both the editor and the menu.
    pub const fn click_outside(&mut self) {
        self.hide_menu();
    }

    // ---- text editing ----------------------------------------------------

    fn with_focused<R>(&mut self, f: impl FnOnce(&mut Block, &mut Focus) -> R) -> Option<R> {
        let mut focus = self.focus?;
        let idx = self.active_page().position(focus.block)?;
        let block = &mut self.page_mut().blocks[idx];
        let result = f(block, &mut focus);
        self.focus = Some(focus);
        Some(result)
    }

    /// Insert literal text at the caret, replacing any selection.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let escaped = inline::escape_text(text);
        self.with_focused(|block, focus| {
            if let Some(range) = focus.selection() {
                block.content = inline::remove_text(&block.content, range.clone());
                focus.caret = range.start;
            }
            focus.anchor = None;
            let caret = focus.caret.min(block.content.len());
            block.content.insert_str(caret, &escaped);
            focus.caret = caret + escaped.len();
        })
        .is_some()
    }

    /// Insert a soft line break inside the focused block.
    pub fn insert_line_break(&mut self) -> bool {
        self.insert_text("\n")
    }

    /// Clipboard paste: the text is inserted as plain text.
    pub fn paste(&mut self, text: &str) -> bool {
        let text = text.replace("\r\n", "\n");
        self.insert_text(&text)
    }

    /// Delete the selection, or the character before the caret.
    pub fn delete_backward(&mut self) -> bool {
        self.with_focused(|block, focus| {
            if let Some(range) = focus.selection() {
                block.content = inline::remove_text(&block.content, range.clone());
                focus.caret = range.start;
                focus.anchor = None;
                return true;
            }
            focus.anchor = None;
            let Some(token) = inline::tokenize(&block.content)
                .into_iter()
                .rev()
                .find(|t| t.range.end <= focus.caret && t.text_char().is_some())
            else {
                return false;
            };
            block.content = inline::remove_text(&block.content, token.range.clone());
            focus.caret = token.range.start;
            true
        })
        .unwrap_or(false)
    }

    /// Delete the selection, or the character after the caret.
    pub fn delete_forward(&mut self) -> bool {
        self.with_focused(|block, focus| {
            if let Some(range) = focus.selection() {
                block.content = inline::remove_text(&block.content, range.clone());
                focus.caret = range.start;
                focus.anchor = None;
                return true;
            }
            focus.anchor = None;
            let Some(token) = inline::tokenize(&block.content)
                .into_iter()
                .find(|t| t.range.start >= focus.caret && t.text_char().is_some())
            else {
                return false;
            };
            block.content = inline::remove_text(&block.content, token.range);
            true
        })
        .unwrap_or(false)
    }

    /// Move the caret; with `extend` the selection grows from its anchor.
    pub fn move_caret(&mut self, movement: CaretMove, extend: bool) -> bool {
        self.with_focused(|block, focus| {
            let content = &block.content;
            let next = match movement {
                CaretMove::Left => inline::prev_boundary(content, focus.caret),
                CaretMove::Right => inline::next_boundary(content, focus.caret),
                CaretMove::Home => 0,
                CaretMove::End => content.len(),
            };
            if extend {
                focus.anchor.get_or_insert(focus.caret);
            } else {
                focus.anchor = None;
            }
            let moved = next != focus.caret;
            focus.caret = next;
            moved
        })
        .unwrap_or(false)
    }

    /// Select the focused block's whole content.
    pub fn select_all_in_block(&mut self) -> bool {
        self.with_focused(|block, focus| {
            focus.anchor = Some(0);
            focus.caret = block.content.len();
        })
        .is_some()
    }

    /// Move focus to the previous block, caret at its end.
    pub fn focus_previous(&mut self) -> bool {
        self.focused_id()
            .and_then(|id| self.previous_block(id))
            .is_some_and(|prev| self.focus_block(prev))
    }

    /// Move focus to the next block, caret at its end.
    pub fn focus_next(&mut self) -> bool {
        self.focused_id()
            .and_then(|id| self.next_block(id))
            .is_some_and(|next| self.focus_block(next))
    }

    /// Toggle inline formatting over the focused block's selection.
    pub fn toggle_format(&mut self, format: Format) -> bool {
        self.with_focused(|block, focus| {
            let Some(range) = focus.selection() else {
                return false;
            };
            let Some((content, selected)) = inline::toggle_format(&block.content, range, format)
            else {
                return false;
            };
            block.content = content;
            focus.anchor = Some(selected.start);
            focus.caret = selected.end;
            true
        })
        .unwrap_or(false)
    }
}
