//! Keyboard command dispatch.
//!
//! Hosts translate their native key events into [`KeyInput`] and hand them
//! to [`Session::handle_key`]. Rules are tried in a fixed priority order
//! and only the first match fires; an [`KeyOutcome::Unhandled`] result
//! tells the host to apply its default behaviour for the key.

use crate::document::inline::Format;

use super::{Command, Session};

/// Host-neutral key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Char(char),
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub const fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::CTRL)
    }

    /// Whether the key can change page content. Caret movement, Escape and
    /// the save shortcut never do.
    pub const fn may_edit(self) -> bool {
        match self.key {
            Key::Up | Key::Down | Key::Left | Key::Right | Key::Home | Key::End | Key::Escape => {
                false
            }
            Key::Char(c) if self.modifiers.command() => {
                matches!(c, 'b' | 'i' | 'u' | 'B' | 'I' | 'U')
            }
            Key::Char(_) => !self.modifiers.alt,
            Key::Enter | Key::Backspace | Key::Delete | Key::Tab | Key::BackTab => true,
        }
    }
}

/// What a handled key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Enter: a new paragraph was created after the focused block.
    SplitBlock,
    /// Backspace in an empty block: it was removed, focus moved back.
    DeleteEmptyBlock,
    /// `/` in an empty block: the block menu opened.
    OpenMenu,
    Indent,
    Outdent,
    Format(Format),
    Save,
    MenuMove,
    MenuSelect,
    MenuCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A rule fired; the platform default must be suppressed.
    Handled(KeyAction),
    /// No rule matched; the host should apply the key's default effect.
    Unhandled,
}

impl KeyOutcome {
    pub const fn prevents_default(self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Character that opens the block menu when typed into an empty block.
pub const MENU_TRIGGER: char = '/';

impl Session {
    /// Dispatch a key press against the focused block.
    pub fn handle_key(&mut self, input: KeyInput) -> KeyOutcome {
        if let Some(outcome) = self.handle_menu_key(input) {
            return outcome;
        }

        let focused = self.focused_id();
        let mods = input.modifiers;

        // Submit: new paragraph after the current block.
        if input.key == Key::Enter && !mods.shift {
            self.create_block(focused);
            return KeyOutcome::Handled(KeyAction::SplitBlock);
        }

        // Backspace in an empty block merges back into the previous one.
        if input.key == Key::Backspace
            && let Some(id) = focused
            && self.is_block_empty(id)
            && let Some(prev) = self.previous_block(id)
        {
            self.delete_block(id);
            self.focus_block(prev);
            return KeyOutcome::Handled(KeyAction::DeleteEmptyBlock);
        }

        if input.key == Key::Char(MENU_TRIGGER)
            && !mods.command()
            && !mods.alt
            && let Some(id) = focused
            && self.is_block_empty(id)
        {
            self.open_menu(id);
            return KeyOutcome::Handled(KeyAction::OpenMenu);
        }

        match input.key {
            Key::Tab | Key::BackTab => {
                let outdent = input.key == Key::BackTab || mods.shift;
                if let Some(id) = focused {
                    if outdent {
                        self.outdent_block(id);
                    } else {
                        self.indent_block(id);
                    }
                }
                return KeyOutcome::Handled(if outdent {
                    KeyAction::Outdent
                } else {
                    KeyAction::Indent
                });
            }
            Key::Char(c) if mods.command() => {
                let (command, action) = match c.to_ascii_lowercase() {
                    'b' => (Command::Bold, KeyAction::Format(Format::Bold)),
                    'i' => (Command::Italic, KeyAction::Format(Format::Italic)),
                    'u' => (Command::Underline, KeyAction::Format(Format::Underline)),
                    's' => (Command::Save, KeyAction::Save),
                    _ => return KeyOutcome::Unhandled,
                };
                self.execute(command);
                return KeyOutcome::Handled(action);
            }
            _ => {}
        }

        KeyOutcome::Unhandled
    }

    fn handle_menu_key(&mut self, input: KeyInput) -> Option<KeyOutcome> {
        if input.key == Key::Escape {
            if self.menu.is_open() {
                self.hide_menu();
                return Some(KeyOutcome::Handled(KeyAction::MenuCancel));
            }
            return None;
        }
        if !self.menu.is_open() {
            return None;
        }
        match input.key {
            Key::Up => {
                self.step_menu(-1);
                Some(KeyOutcome::Handled(KeyAction::MenuMove))
            }
            Key::Down => {
                self.step_menu(1);
                Some(KeyOutcome::Handled(KeyAction::MenuMove))
            }
            Key::Enter => {
                if let Some(block_type) = self.menu.highlighted() {
                    self.select_menu_type(block_type);
                }
                Some(KeyOutcome::Handled(KeyAction::MenuSelect))
            }
            _ => None,
        }
    }
}
