use std::collections::HashMap;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Model;
use crate::document::inline::styled_spans;
use crate::document::{self, BlockId, BlockType};

use super::layout::{self, BlockLine, NEW_PAGE_LABEL};
use super::{overlays, status, style};

const PLACEHOLDER: &str = "Type '/' for commands";

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let areas = layout::areas(model, area);

    render_sidebar(model, frame, areas.sidebar);
    render_editor(model, frame, areas.editor);
    if let Some(toast_area) = areas.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, areas.status);

    if let Some(menu) = layout::menu_rect(model, area) {
        overlays::render_block_menu(model, frame, menu);
    }
    if model.prompt_active() {
        overlays::render_page_prompt(model, frame, area);
    } else if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_sidebar(model: &Model, frame: &mut Frame, area: Rect) {
    let active = model.active_page_index();
    let mut items: Vec<Line> = model
        .session
        .pages()
        .iter()
        .enumerate()
        .map(|(i, page)| {
            if i == active {
                Line::styled(
                    format!("> {}", page.title),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::raw(format!("  {}", page.title))
            }
        })
        .collect();
    items.push(Line::styled(NEW_PAGE_LABEL, style::placeholder_style()));

    let sidebar = Block::default().title("Pages").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(items).block(sidebar), area);
}

/// Each block's text split into styled display lines.
fn text_lines(block: &document::Block) -> Vec<Vec<Span<'static>>> {
    let base = style::style_for_block(block.block_type);
    let mut lines = vec![Vec::new()];
    for span in styled_spans(&block.content) {
        let span_style = style::style_for_inline(base, span.style());
        for (i, part) in span.text().split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !part.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.push(Span::styled(part.to_string(), span_style));
            }
        }
    }
    lines
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let session = &model.session;
    let title = format!(" {} ", session.active_page().title);
    let border = if session.focus().is_some() {
        style::focused_border_style()
    } else {
        Style::default()
    };
    let pane = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);
    let inner = pane.inner(area);
    frame.render_widget(pane, area);

    let lines = layout::block_lines(session.blocks());
    let height = usize::from(inner.height);
    let start = model.scroll_offset.min(lines.len());
    let visible = &lines[start..(start + height).min(lines.len())];

    let mut cache: HashMap<BlockId, Vec<Vec<Span<'static>>>> = HashMap::new();
    let focused = session.focused_id();
    let rendered: Vec<Line> = visible
        .iter()
        .map(|row| {
            let block_lines = cache.entry(row.block).or_insert_with(|| {
                session.block(row.block).map(text_lines).unwrap_or_default()
            });
            let mut spans = vec![
                Span::raw(" ".repeat(usize::from(row.indent))),
                Span::styled(row.prefix.clone(), style::style_for_prefix(row.block_type)),
            ];
            let text = block_lines.get(row.line).cloned().unwrap_or_default();
            let empty = session.block(row.block).is_none_or(document::Block::is_empty);
            if empty && focused == Some(row.block) && row.line == 0 && !session.menu().is_open() {
                spans.push(Span::styled(PLACEHOLDER, style::placeholder_style()));
            } else {
                spans.extend(text);
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(rendered), inner);

    // Code rows get a full-width band.
    for (i, row) in visible.iter().enumerate() {
        if row.block_type == BlockType::Code {
            let y = inner.y + u16::try_from(i).unwrap_or(u16::MAX);
            let x = inner.x + row.indent.min(inner.width);
            let band = Rect::new(x, y, inner.width.saturating_sub(x - inner.x), 1);
            let bg = style::style_for_block(BlockType::Code).bg.unwrap_or_default();
            frame.buffer_mut().set_style(band, Style::default().bg(bg));
        }
    }

    render_selection(model, frame, inner, visible);
    place_caret(model, frame, inner, visible);
}

/// Screen row (relative to the pane) showing `line` of `block`.
fn row_of(visible: &[BlockLine], block: BlockId, line: usize) -> Option<(u16, &BlockLine)> {
    let idx = visible
        .iter()
        .position(|r| r.block == block && r.line == line)?;
    u16::try_from(idx).ok().map(|row| (row, &visible[idx]))
}

fn render_selection(model: &Model, frame: &mut Frame, inner: Rect, visible: &[BlockLine]) {
    let Some(focus) = model.session.focus() else {
        return;
    };
    let Some(range) = focus.selection() else {
        return;
    };
    let Some(block) = model.session.block(focus.block) else {
        return;
    };
    let (first_line, first_col) = layout::caret_position(&block.content, range.start);
    let (last_line, last_col) = layout::caret_position(&block.content, range.end);
    for line in first_line..=last_line {
        let Some((row, row_line)) = row_of(visible, focus.block, line) else {
            continue;
        };
        let from = if line == first_line { first_col } else { 0 };
        let to = if line == last_line {
            last_col
        } else {
            inner.width
        };
        let x = inner.x.saturating_add(row_line.text_start()).saturating_add(from);
        let right = inner.x + inner.width;
        if x >= right || to <= from {
            continue;
        }
        let width = (to - from).min(right - x);
        frame
            .buffer_mut()
            .set_style(Rect::new(x, inner.y + row, width, 1), style::selection_style());
    }
}

fn place_caret(model: &Model, frame: &mut Frame, inner: Rect, visible: &[BlockLine]) {
    if model.prompt_active() || model.help_visible || model.session.menu().is_open() {
        return;
    }
    let Some(focus) = model.session.focus() else {
        return;
    };
    let Some(block) = model.session.block(focus.block) else {
        return;
    };
    let (line, col) = layout::caret_position(&block.content, focus.caret);
    let Some((row, row_line)) = row_of(visible, focus.block, line) else {
        return;
    };
    let x = inner
        .x
        .saturating_add(row_line.text_start())
        .saturating_add(col)
        .min(inner.x + inner.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(x, inner.y + row));
}
