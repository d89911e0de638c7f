//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Margin, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::Model;
use crate::document::inline::{self, Token};
use crate::document::{Block, BlockId, BlockType};

/// Sidebar width in columns (before clamping to a third of the screen).
pub const SIDEBAR_WIDTH: u16 = 22;
/// Columns of indentation per block level.
pub const INDENT_COLUMNS: u16 = 2;
/// Label of the sidebar row that opens the new-page prompt.
pub const NEW_PAGE_LABEL: &str = "+ New page";

/// Regions of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub sidebar: Rect,
    pub editor: Rect,
    pub toast: Option<Rect>,
    pub status: Rect,
}

impl Areas {
    /// The editor pane without its border.
    pub fn editor_inner(&self) -> Rect {
        self.editor.inner(Margin::new(1, 1))
    }
}

pub fn screen_area(model: &Model) -> Rect {
    let (width, height) = model.terminal_size;
    Rect::new(0, 0, width, height)
}

pub fn areas(model: &Model, area: Rect) -> Areas {
    let footer_rows = 1 + u16::from(model.active_toast().is_some());
    let body_height = area.height.saturating_sub(footer_rows);
    let sidebar_width = SIDEBAR_WIDTH.min(area.width / 3);
    let sidebar = Rect::new(area.x, area.y, sidebar_width, body_height);
    let editor = Rect::new(
        area.x + sidebar_width,
        area.y,
        area.width.saturating_sub(sidebar_width),
        body_height,
    );
    let mut y = area.y + body_height;
    let toast = model.active_toast().map(|_| {
        let rect = Rect::new(area.x, y, area.width, 1);
        y += 1;
        rect
    });
    let status = Rect::new(area.x, y, area.width, 1.min(area.height));
    Areas {
        sidebar,
        editor,
        toast,
        status,
    }
}

/// One rendered row of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLine {
    pub block: BlockId,
    pub block_type: BlockType,
    /// Line index inside the block's text.
    pub line: usize,
    /// Column where the block's prefix starts, relative to the pane.
    pub indent: u16,
    /// Marker drawn before the text (`• `, `3. `, `│ `); continuation rows
    /// carry blanks of the same width.
    pub prefix: String,
}

impl BlockLine {
    /// Column where the block's text starts, relative to the pane.
    pub fn text_start(&self) -> u16 {
        let width = u16::try_from(self.prefix.width()).unwrap_or(u16::MAX);
        self.indent.saturating_add(width)
    }
}

/// Every row the editor pane would show for `blocks`, top to bottom.
pub fn block_lines(blocks: &[Block]) -> Vec<BlockLine> {
    let mut rows = Vec::new();
    let mut numbering: Vec<usize> = Vec::new();
    for block in blocks {
        let level = usize::from(block.level);
        if block.block_type == BlockType::NumberedItem {
            numbering.resize(level + 1, 0);
            numbering[level] += 1;
        } else {
            numbering.truncate(level);
        }
        let prefix = match block.block_type {
            BlockType::BulletedItem => "• ".to_string(),
            BlockType::NumberedItem => format!("{}. ", numbering[level]),
            BlockType::Quote => "│ ".to_string(),
            BlockType::Code => "  ".to_string(),
            _ => String::new(),
        };
        let blank = " ".repeat(prefix.width());
        let line_count = block.plain_text().split('\n').count();
        for line in 0..line_count {
            rows.push(BlockLine {
                block: block.id,
                block_type: block.block_type,
                line,
                indent: u16::from(block.level) * INDENT_COLUMNS,
                prefix: if line == 0 {
                    prefix.clone()
                } else {
                    blank.clone()
                },
            });
        }
    }
    rows
}

/// Line and display column of a caret offset inside `content`.
pub fn caret_position(content: &str, caret: usize) -> (usize, u16) {
    let prefix = inline::plain_prefix(content, caret);
    let line = prefix.matches('\n').count();
    let tail = prefix.rsplit('\n').next().unwrap_or_default();
    (line, u16::try_from(tail.width()).unwrap_or(u16::MAX))
}

/// Caret offset for a display column on a line of `content`.
pub fn caret_for_column(content: &str, line: usize, column: u16) -> usize {
    let column = usize::from(column);
    let mut current = 0;
    let mut width = 0;
    for token in inline::tokenize(content) {
        let Some(ch) = token.text_char() else {
            continue;
        };
        if current == line {
            if ch == '\n' {
                return token.range.start;
            }
            let w = ch.width().unwrap_or(0);
            if width + w > column {
                return token.range.start;
            }
            width += w;
        } else if ch == '\n' {
            current += 1;
        }
    }
    content.len()
}

/// Row (in block-line space) holding the focused caret.
fn focus_row(model: &Model, lines: &[BlockLine]) -> Option<usize> {
    let focus = model.session.focus()?;
    let block = model.session.block(focus.block)?;
    let (line, _) = caret_position(&block.content, focus.caret);
    lines
        .iter()
        .position(|l| l.block == focus.block && l.line == line)
}

/// Largest useful scroll offset for the editor pane.
pub fn max_scroll(model: &Model) -> usize {
    let inner = areas(model, screen_area(model)).editor_inner();
    block_lines(model.session.blocks())
        .len()
        .saturating_sub(usize::from(inner.height))
}

/// Scroll offset that keeps the caret row visible.
pub fn scroll_to_focus(model: &Model) -> usize {
    let inner = areas(model, screen_area(model)).editor_inner();
    let lines = block_lines(model.session.blocks());
    let height = usize::from(inner.height).max(1);
    let offset = model
        .scroll_offset
        .min(lines.len().saturating_sub(height));
    match focus_row(model, &lines) {
        Some(row) if row < offset => row,
        Some(row) if row >= offset + height => row + 1 - height,
        _ => offset,
    }
}

/// Block-menu popup position: just below the anchor block.
pub fn menu_rect(model: &Model, area: Rect) -> Option<Rect> {
    let anchor = model.session.menu().anchor()?;
    let inner = areas(model, area).editor_inner();
    let lines = block_lines(model.session.blocks());
    let row = lines
        .iter()
        .rposition(|l| l.block == anchor)
        .unwrap_or_default();
    let line = lines.get(row)?;
    let visible_row = row.checked_sub(model.scroll_offset).unwrap_or_default();
    let below = u16::try_from(visible_row + 1).unwrap_or(u16::MAX);
    let height = u16::try_from(BlockType::ALL.len()).unwrap_or(u16::MAX) + 2;
    let width = 24.min(inner.width);
    let x = inner.x + line.indent.min(inner.width.saturating_sub(width));
    let mut y = inner.y.saturating_add(below);
    if y + height > area.y + area.height {
        // Not enough room below: open above the anchor instead.
        y = (inner.y + below.saturating_sub(1)).saturating_sub(height);
    }
    Some(Rect::new(x, y, width, height.min(area.height)))
}

/// What lies under a screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Page(usize),
    NewPage,
    Block(BlockId, usize),
    MenuItem(BlockType),
    /// Editor pane, below the last block.
    EditorBlank,
    Outside,
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

pub fn hit_test(model: &Model, area: Rect, column: u16, row: u16) -> Hit {
    if let Some(menu) = menu_rect(model, area)
        && contains(menu, column, row)
    {
        let idx = usize::from(row.saturating_sub(menu.y + 1));
        return BlockType::ALL
            .get(idx)
            .map_or(Hit::Outside, |ty| Hit::MenuItem(*ty));
    }

    let areas = areas(model, area);
    let sidebar = areas.sidebar.inner(Margin::new(1, 1));
    if contains(sidebar, column, row) {
        let idx = usize::from(row - sidebar.y);
        let pages = model.session.pages().len();
        return match idx.cmp(&pages) {
            std::cmp::Ordering::Less => Hit::Page(idx),
            std::cmp::Ordering::Equal => Hit::NewPage,
            std::cmp::Ordering::Greater => Hit::Outside,
        };
    }

    let inner = areas.editor_inner();
    if !contains(inner, column, row) {
        return Hit::Outside;
    }
    let lines = block_lines(model.session.blocks());
    let idx = model.scroll_offset + usize::from(row - inner.y);
    let Some(line) = lines.get(idx) else {
        return Hit::EditorBlank;
    };
    let Some(block) = model.session.block(line.block) else {
        return Hit::EditorBlank;
    };
    let rel = column - inner.x;
    let caret = if rel < line.text_start() {
        line_start(&block.content, line.line)
    } else {
        caret_for_column(&block.content, line.line, rel - line.text_start())
    };
    Hit::Block(line.block, caret)
}

fn line_start(content: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    inline::tokenize(content)
        .iter()
        .filter(|t| t.text_char() == Some('\n'))
        .nth(line - 1)
        .map_or(content.len(), |t: &Token| t.range.end)
}
