//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::document::BlockType;
use crate::document::inline::InlineStyle;

/// Get the style for a block's text.
pub fn style_for_block(block_type: BlockType) -> Style {
    match block_type {
        // Headings - bold with distinct colors per level
        BlockType::Heading1 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        BlockType::Heading2 => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        BlockType::Heading3 => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),

        // Code blocks - dimmer color on a dark band
        BlockType::Code => Style::default()
            .fg(Color::Indexed(250))
            .bg(Color::Indexed(236)),

        BlockType::Quote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),

        BlockType::Paragraph | BlockType::BulletedItem | BlockType::NumberedItem => {
            Style::default()
        }
    }
}

/// Style of list bullets, numbers and the quote bar.
pub fn style_for_prefix(block_type: BlockType) -> Style {
    match block_type {
        BlockType::Quote => Style::default().fg(Color::Blue),
        BlockType::Code => style_for_block(BlockType::Code),
        _ => Style::default().fg(Color::Yellow),
    }
}

/// Get the style for an inline span, merged with the block's style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Highlight applied over selected text.
pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(Color::Indexed(243))
}

pub fn popup_style() -> Style {
    Style::default().bg(Color::Black).fg(Color::White)
}

pub fn focused_border_style() -> Style {
    Style::default().fg(Color::Yellow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for ty in [BlockType::Heading1, BlockType::Heading2, BlockType::Heading3] {
            assert!(style_for_block(ty).add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = style_for_block(BlockType::Heading1);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_code_block_has_background() {
        assert!(style_for_block(BlockType::Code).bg.is_some());
    }

    #[test]
    fn test_inline_flags_add_modifiers() {
        let inline = InlineStyle {
            bold: true,
            underline: true,
            ..InlineStyle::default()
        };
        let styled = style_for_inline(Style::default().fg(Color::Cyan), inline);
        assert!(styled.add_modifier.contains(Modifier::BOLD));
        assert!(styled.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!styled.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(styled.fg, Some(Color::Cyan));
    }
}
