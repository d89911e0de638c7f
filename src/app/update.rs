use crate::app::{Model, ToastLevel};
use crate::document::{BlockId, BlockType};
use crate::session::{
    CaretMove, Command, CommandOutcome, Key, KeyInput, KeyOutcome,
};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// A key press for the editor surface
    Key(KeyInput),
    /// Bracketed paste
    Paste(String),
    /// Select the focused block's content
    SelectAll,
    /// Run an editor command
    Command(Command),

    // Pointer
    /// Click on a block, with the caret offset under the pointer
    ClickBlock(BlockId, Option<usize>),
    /// Click on a block menu entry
    MenuPick(BlockType),
    /// Click outside the editor and the menu
    ClickOutside,
    /// Scroll the editor pane up by n rows
    ScrollUp(usize),
    /// Scroll the editor pane down by n rows
    ScrollDown(usize),

    // Pages
    /// Activate a page from the sidebar
    SwitchPage(String),
    /// Activate the next page in the sidebar
    NextPage,
    /// Activate the previous page in the sidebar
    PrevPage,
    /// Open the new-page name prompt
    StartNewPage,
    /// Append a character to the prompt
    PromptInput(char),
    /// Remove the last prompt character
    PromptBackspace,
    /// Create the page named in the prompt
    PromptSubmit,
    /// Close the prompt without creating anything
    PromptCancel,

    // Export
    /// Copy the active page as markdown to the clipboard
    CopyMarkdown,

    // Window
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Whether the message may change page content and so should schedule
    /// a save.
    pub const fn is_edit(&self) -> bool {
        match self {
            Self::Key(input) => input.may_edit(),
            Self::Paste(_) | Self::MenuPick(_) => true,
            Self::Command(command) => !matches!(command, Command::Save | Command::Share),
            _ => false,
        }
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Writing
/// files and talking to the terminal is left to the effects layer.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Key(input) => apply_key(&mut model, input),
        Message::Paste(text) => {
            model.session.paste(&text);
        }
        Message::SelectAll => {
            model.session.select_all_in_block();
        }
        Message::Command(command) => run_command(&mut model, command),

        Message::ClickBlock(id, caret) => model.session.click_block(id, caret),
        Message::MenuPick(block_type) => {
            model.session.select_menu_type(block_type);
        }
        Message::ClickOutside => model.session.click_outside(),
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            let max = crate::ui::max_scroll(&model);
            model.scroll_offset = (model.scroll_offset + n).min(max);
        }

        Message::SwitchPage(key) => {
            model.session.switch_page(&key);
            model.session.focus_first();
            model.scroll_offset = 0;
        }
        Message::NextPage => step_page(&mut model, 1),
        Message::PrevPage => step_page(&mut model, -1),
        Message::StartNewPage => {
            model.session.hide_menu();
            model.page_prompt = Some(String::new());
        }
        Message::PromptInput(c) => {
            if let Some(prompt) = model.page_prompt.as_mut() {
                prompt.push(c);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.page_prompt.as_mut() {
                prompt.pop();
            }
        }
        Message::PromptSubmit => {
            if let Some(name) = model.page_prompt.take() {
                match model.session.create_page(&name) {
                    Some(key) => {
                        model.session.focus_first();
                        model.scroll_offset = 0;
                        model.show_toast(ToastLevel::Info, format!("Opened page {key}"));
                    }
                    None => model.show_toast(ToastLevel::Warning, "Page name cannot be empty"),
                }
            }
        }
        Message::PromptCancel => model.page_prompt = None,

        // Clipboard output happens in the effects layer.
        Message::CopyMarkdown => {}

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
        }

        Message::Quit => model.should_quit = true,
    }

    model.scroll_offset = crate::ui::scroll_to_focus(&model);
    model
}

fn step_page(model: &mut Model, delta: isize) {
    if let Some(key) = model.neighbour_page(delta) {
        model.session.switch_page(&key);
        model.session.focus_first();
        model.scroll_offset = 0;
    }
}

fn run_command(model: &mut Model, command: Command) {
    match model.session.execute(command) {
        CommandOutcome::Exported(artifact) => model.pending_export = Some(artifact),
        CommandOutcome::SaveFailed => {
            model.show_toast(ToastLevel::Error, "Save failed (see log)");
        }
        outcome => {
            if let Some(notice) = outcome.notice() {
                model.show_toast(ToastLevel::Info, notice);
            }
        }
    }
}

/// Feed a key to the session and apply the default editing behaviour
/// when no editor rule claims it.
fn apply_key(model: &mut Model, input: KeyInput) {
    let session = &mut model.session;
    match session.handle_key(input) {
        KeyOutcome::Handled(action) => tracing::trace!(?action, "key handled"),
        KeyOutcome::Unhandled => {
            let extend = input.modifiers.shift;
            match input.key {
                Key::Char(c) if !input.modifiers.command() && !input.modifiers.alt => {
                    let mut buf = [0u8; 4];
                    session.insert_text(c.encode_utf8(&mut buf));
                }
                Key::Enter => {
                    session.insert_line_break();
                }
                Key::Backspace => {
                    session.delete_backward();
                }
                Key::Delete => {
                    session.delete_forward();
                }
                Key::Left => {
                    session.move_caret(CaretMove::Left, extend);
                }
                Key::Right => {
                    session.move_caret(CaretMove::Right, extend);
                }
                Key::Home => {
                    session.move_caret(CaretMove::Home, extend);
                }
                Key::End => {
                    session.move_caret(CaretMove::End, extend);
                }
                Key::Up => {
                    if session.focus().is_none() {
                        session.focus_first();
                    } else {
                        session.focus_previous();
                    }
                }
                Key::Down => {
                    if session.focus().is_none() {
                        session.focus_first();
                    } else {
                        session.focus_next();
                    }
                }
                Key::Char(_) | Key::Tab | Key::BackTab | Key::Escape => {}
            }
        }
    }
}
