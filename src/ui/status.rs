use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let session = &model.session;
    let page = &session.active_page().title;
    let block_info = session.focused_block().map_or_else(String::new, |block| {
        if block.level > 0 {
            format!("  {} L{}", block.block_type.label(), block.level)
        } else {
            format!("  {}", block.block_type.label())
        }
    });
    let save_indicator = if session.save_pending() {
        "  [modified]"
    } else {
        ""
    };

    let status = format!(
        " {}  [{} blocks]{}{}  F1:help",
        page,
        session.blocks().len(),
        block_info,
        save_indicator
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
