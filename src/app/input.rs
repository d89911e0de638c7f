use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::document::BlockType;
use crate::session::{Command, Key, KeyInput, Modifiers};
use crate::ui::{Hit, hit_test, screen_area};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(*key, model),
            Event::Mouse(mouse) => handle_mouse(*mouse, model),
            Event::Paste(text) if !model.prompt_active() && !model.help_visible => {
                Some(Message::Paste(text.clone()))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return matches!(mouse.kind, MouseEventKind::Down(_)).then_some(Message::HideHelp);
    }
    if model.prompt_active() {
        return None;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = hit_test(model, screen_area(model), mouse.column, mouse.row);
            Some(match hit {
                Hit::Page(idx) => Message::SwitchPage(model.session.pages().get(idx)?.key.clone()),
                Hit::NewPage => Message::StartNewPage,
                Hit::Block(id, caret) => Message::ClickBlock(id, Some(caret)),
                Hit::MenuItem(block_type) => Message::MenuPick(block_type),
                Hit::EditorBlank => {
                    let last = model.session.blocks().last()?;
                    Message::ClickBlock(last.id, None)
                }
                Hit::Outside => Message::ClickOutside,
            })
        }
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(3)),
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(3)),
        _ => None,
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if model.help_visible {
        return Some(Message::HideHelp);
    }

    if model.prompt_active() {
        return match key.code {
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => Some(Message::PromptSubmit),
            KeyCode::Backspace => Some(Message::PromptBackspace),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::PromptInput(c)),
            _ => None,
        };
    }

    // Application shortcuts
    match key.code {
        KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
        KeyCode::Char('n') if ctrl => return Some(Message::StartNewPage),
        KeyCode::Char('a') if ctrl => return Some(Message::SelectAll),
        KeyCode::F(1) => return Some(Message::ToggleHelp),
        KeyCode::F(2) => return Some(Message::Command(Command::Save)),
        KeyCode::F(3) => return Some(Message::Command(Command::Share)),
        KeyCode::F(4) => return Some(Message::CopyMarkdown),
        KeyCode::Up if alt => return Some(Message::PrevPage),
        KeyCode::Down if alt => return Some(Message::NextPage),
        KeyCode::PageUp if ctrl => return Some(Message::PrevPage),
        KeyCode::PageDown if ctrl => return Some(Message::NextPage),
        KeyCode::Char(c @ '1'..='8') if alt => {
            let idx = c.to_digit(10).and_then(|d| usize::try_from(d).ok())? - 1;
            let block_type = BlockType::ALL.get(idx)?;
            return Some(Message::Command(Command::SetType(*block_type)));
        }
        _ => {}
    }

    key_input(key).map(Message::Key)
}

/// Translate a crossterm key event into the editor's key model.
pub(super) fn key_input(key: KeyEvent) -> Option<KeyInput> {
    let modifiers = Modifiers {
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key.modifiers.contains(KeyModifiers::SUPER),
    };
    let key = match key.code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(KeyInput::new(key, modifiers))
}
