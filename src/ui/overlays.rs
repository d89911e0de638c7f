use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::document::BlockType;

use super::style;

pub fn render_block_menu(model: &Model, frame: &mut Frame, popup: Rect) {
    let highlighted = model.session.menu().highlighted();
    let lines: Vec<Line> = BlockType::ALL
        .iter()
        .map(|ty| {
            let label = format!(" {:<16}{:>4}", ty.label(), ty.tag());
            if Some(*ty) == highlighted {
                Line::styled(label, Style::default().add_modifier(Modifier::REVERSED))
            } else {
                Line::raw(label)
            }
        })
        .collect();

    let block = Block::default()
        .title("Turn into")
        .borders(Borders::ALL)
        .style(style::popup_style());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_page_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(name) = model.page_prompt.as_deref() else {
        return;
    };
    let popup = centered_popup_rect(area.width.saturating_sub(16).clamp(20, 48), 6, area);
    let dim_style = Style::default().fg(Color::Indexed(245));
    let lines = vec![
        Line::from(vec![
            Span::raw("Name: "),
            Span::styled(
                name.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::styled("Enter creates \u{2502} Esc cancels", dim_style),
    ];
    let block = Block::default()
        .title("New page")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(style::popup_style());
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);

    let typed = u16::try_from(unicode_width::UnicodeWidthStr::width(name)).unwrap_or(u16::MAX);
    let x = inner
        .x
        .saturating_add(6)
        .saturating_add(typed)
        .min(inner.x + inner.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(x, inner.y));
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Editing", section_style));
    all_lines.push(Line::raw("  Enter               New block below"));
    all_lines.push(Line::raw("  Shift+Enter         Line break"));
    all_lines.push(Line::raw("  Backspace           Delete empty block"));
    all_lines.push(Line::raw("  /                   Block menu (empty block)"));
    all_lines.push(Line::raw("  Tab / Shift+Tab     Indent / outdent"));
    all_lines.push(Line::raw("  Ctrl-b / i / u      Bold / italic / underline"));
    all_lines.push(Line::raw("  Shift+arrows        Select"));
    all_lines.push(Line::raw("  Ctrl-a              Select block"));
    all_lines.push(Line::raw("  Up / Down           Previous / next block"));
    all_lines.push(Line::raw("  Alt+1..8            Turn into (menu order)"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Pages", section_style));
    all_lines.push(Line::raw("  Alt+Up / Alt+Down   Previous / next page"));
    all_lines.push(Line::raw("  Ctrl-n              New page"));
    all_lines.push(Line::raw("  Click sidebar       Open page"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Files", section_style));
    all_lines.push(Line::raw("  Ctrl-s / F2         Save"));
    all_lines.push(Line::raw("  F3                  Share page as HTML"));
    all_lines.push(Line::raw("  F4                  Copy page as markdown"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));
    all_lines.push(Line::raw(format!(
        "  Export dir: {}",
        model.export_dir.display()
    )));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(style::popup_style());

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = usize::from(content_height_u16);
    let visible: Vec<Line> = all_lines.into_iter().take(content_height).collect();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
