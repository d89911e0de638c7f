use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tempfile::tempdir;

use crate::document::BlockType;
use crate::session::{Command, Key, KeyInput, Modifiers, Session};
use crate::store::MemoryStore;

use super::event_loop::ResizeDebouncer;
use super::input::{handle_key, handle_mouse, key_input};
use super::{App, Message, Model, ToastLevel, update};

fn create_test_model() -> Model {
    let mut session = Session::new(Box::new(MemoryStore::new()));
    session.load();
    Model::new(session, (80, 24))
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn type_text(mut model: Model, text: &str) -> Model {
    for c in text.chars() {
        model = update(model, Message::Key(KeyInput::plain(Key::Char(c))));
    }
    model
}

#[test]
fn test_typing_into_focused_block() {
    let mut model = create_test_model();
    let para = model.session.blocks()[1].id;
    model.session.click_block(para, Some(0));
    let model = type_text(model, "Hi ");
    assert_eq!(
        model.session.blocks()[1].content,
        "Hi Start typing to create your content..."
    );
}

#[test]
fn test_arrow_keys_move_between_blocks() {
    let model = update(create_test_model(), Message::Key(KeyInput::plain(Key::Down)));
    let first = model.session.blocks()[0].id;
    assert_eq!(model.session.focused_id(), Some(first));

    let model = update(model, Message::Key(KeyInput::plain(Key::Down)));
    let second = model.session.blocks()[1].id;
    assert_eq!(model.session.focused_id(), Some(second));

    let model = update(model, Message::Key(KeyInput::plain(Key::Up)));
    assert_eq!(model.session.focused_id(), Some(first));
}

#[test]
fn test_shift_arrow_extends_selection() {
    let mut model = create_test_model();
    let heading = model.session.blocks()[0].id;
    model.session.click_block(heading, Some(0));
    for _ in 0..7 {
        model = update(model, Message::Key(KeyInput::new(Key::Right, Modifiers::SHIFT)));
    }
    let focus = model.session.focus().unwrap();
    assert_eq!(focus.selection(), Some(0..7));
}

#[test]
fn test_enter_then_typing_builds_new_block() {
    let mut model = create_test_model();
    let para = model.session.blocks()[1].id;
    model.session.click_block(para, None);
    let model = update(model, Message::Key(KeyInput::plain(Key::Enter)));
    let model = type_text(model, "next");
    assert_eq!(model.session.blocks().len(), 3);
    assert_eq!(model.session.blocks()[2].content, "next");
}

#[test]
fn test_edit_messages_schedule_saves() {
    assert!(Message::Key(KeyInput::plain(Key::Char('a'))).is_edit());
    assert!(Message::Key(KeyInput::plain(Key::Tab)).is_edit());
    assert!(Message::Key(KeyInput::ctrl('b')).is_edit());
    assert!(!Message::Key(KeyInput::ctrl('s')).is_edit());
    assert!(!Message::Key(KeyInput::plain(Key::Down)).is_edit());
    assert!(!Message::Key(KeyInput::new(Key::Left, Modifiers::SHIFT)).is_edit());
    assert!(!Message::Key(KeyInput::plain(Key::Escape)).is_edit());
    assert!(Message::Paste("x".into()).is_edit());
    assert!(Message::Command(Command::Bold).is_edit());
    assert!(!Message::Command(Command::Save).is_edit());
    assert!(!Message::Command(Command::Share).is_edit());
    assert!(!Message::ScrollDown(3).is_edit());
}

#[test]
fn test_ctrl_s_and_navigation_leave_no_save_pending() {
    let mut model = create_test_model();
    App::dispatch(&mut model, Message::Key(KeyInput::plain(Key::Down)), 0);
    assert!(!model.session.save_pending());
    App::dispatch(&mut model, Message::Key(KeyInput::plain(Key::Char('x'))), 10);
    assert!(model.session.save_pending());
    App::dispatch(&mut model, Message::Key(KeyInput::ctrl('s')), 20);
    assert!(!model.session.save_pending());
}

#[test]
fn test_scroll_is_clamped() {
    let mut model = create_test_model();
    let many: String = (0..40).map(|i| format!("row {i}\n")).collect();
    model.session.import_markdown(&many);
    let model = update(model, Message::ScrollDown(5));
    assert_eq!(model.scroll_offset, 5);
    let model = update(model, Message::ScrollUp(3));
    assert_eq!(model.scroll_offset, 2);
    let model = update(model, Message::ScrollDown(500));
    assert_eq!(model.scroll_offset, crate::ui::max_scroll(&model));
}

#[test]
fn test_toggle_help_changes_visibility() {
    let model = create_test_model();
    assert!(!model.help_visible);
    let model = update(model, Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

#[test]
fn test_next_and_prev_page_wrap() {
    let model = update(create_test_model(), Message::NextPage);
    assert_eq!(model.session.active_key(), "notes");
    let model = update(model, Message::PrevPage);
    let model = update(model, Message::PrevPage);
    assert_eq!(model.session.active_key(), "tasks");
    assert_eq!(model.session.blocks()[0].content, "Welcome to Tasks");
}

#[test]
fn test_page_switch_focuses_first_block() {
    let model = update(create_test_model(), Message::SwitchPage("notes".into()));
    let first = model.session.blocks()[0].id;
    assert_eq!(model.session.focused_id(), Some(first));
    let model = type_text(model, "!");
    assert_eq!(model.session.blocks()[0].content, "Welcome to Notes!");
}

#[test]
fn test_prompt_creates_page() {
    let mut model = update(create_test_model(), Message::StartNewPage);
    assert!(model.prompt_active());
    for c in "Ideax".chars() {
        model = update(model, Message::PromptInput(c));
    }
    let model = update(model, Message::PromptBackspace);
    let model = update(model, Message::PromptInput('s'));
    let model = update(model, Message::PromptSubmit);

    assert!(!model.prompt_active());
    assert_eq!(model.session.active_key(), "ideas");
    assert_eq!(model.session.active_page().title, "Ideas");
    assert_eq!(model.active_toast(), Some(("Opened page ideas", ToastLevel::Info)));
}

#[test]
fn test_blank_prompt_warns() {
    let model = update(create_test_model(), Message::StartNewPage);
    let model = update(model, Message::PromptInput(' '));
    let model = update(model, Message::PromptSubmit);
    assert_eq!(model.session.pages().len(), 3);
    assert_eq!(
        model.active_toast(),
        Some(("Page name cannot be empty", ToastLevel::Warning))
    );
}

#[test]
fn test_prompt_cancel_keeps_page() {
    let model = update(create_test_model(), Message::StartNewPage);
    let model = update(model, Message::PromptInput('x'));
    let model = update(model, Message::PromptCancel);
    assert!(!model.prompt_active());
    assert_eq!(model.session.active_key(), "main");
}

#[test]
fn test_share_sets_pending_export() {
    let model = update(create_test_model(), Message::Command(Command::Share));
    let artifact = model.pending_export.as_ref().unwrap();
    assert_eq!(artifact.file_name, "main-content.html");
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

// ---- input translation -----------------------------------------------------

#[test]
fn test_key_input_carries_modifiers() {
    let input = key_input(press(KeyCode::Char('b'), KeyModifiers::CONTROL)).unwrap();
    assert_eq!(input, KeyInput::ctrl('b'));

    let input = key_input(press(KeyCode::BackTab, KeyModifiers::SHIFT)).unwrap();
    assert_eq!(input.key, Key::BackTab);
    assert!(input.modifiers.shift);

    let input = key_input(press(KeyCode::Char('u'), KeyModifiers::SUPER)).unwrap();
    assert!(input.modifiers.meta);

    assert!(key_input(press(KeyCode::F(9), KeyModifiers::NONE)).is_none());
}

#[test]
fn test_application_shortcuts() {
    let model = create_test_model();
    let cases = [
        (press(KeyCode::Char('q'), KeyModifiers::CONTROL), Message::Quit),
        (press(KeyCode::Char('c'), KeyModifiers::CONTROL), Message::Quit),
        (press(KeyCode::F(1), KeyModifiers::NONE), Message::ToggleHelp),
        (
            press(KeyCode::F(2), KeyModifiers::NONE),
            Message::Command(Command::Save),
        ),
        (
            press(KeyCode::F(3), KeyModifiers::NONE),
            Message::Command(Command::Share),
        ),
        (press(KeyCode::F(4), KeyModifiers::NONE), Message::CopyMarkdown),
        (press(KeyCode::Char('n'), KeyModifiers::CONTROL), Message::StartNewPage),
        (press(KeyCode::Down, KeyModifiers::ALT), Message::NextPage),
        (press(KeyCode::Up, KeyModifiers::ALT), Message::PrevPage),
        (
            press(KeyCode::Char('3'), KeyModifiers::ALT),
            Message::Command(Command::SetType(BlockType::Heading2)),
        ),
    ];
    for (key, expected) in cases {
        assert_eq!(handle_key(key, &model), Some(expected), "{key:?}");
    }
}

#[test]
fn test_ctrl_s_reaches_the_editor() {
    let model = create_test_model();
    let msg = handle_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL), &model);
    assert_eq!(msg, Some(Message::Key(KeyInput::ctrl('s'))));
}

#[test]
fn test_prompt_captures_keys() {
    let model = update(create_test_model(), Message::StartNewPage);
    assert_eq!(
        handle_key(press(KeyCode::Char('q'), KeyModifiers::NONE), &model),
        Some(Message::PromptInput('q'))
    );
    assert_eq!(
        handle_key(press(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::PromptSubmit)
    );
    assert_eq!(
        handle_key(press(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::PromptCancel)
    );
}

#[test]
fn test_any_key_closes_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(
        handle_key(press(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_mouse_click_on_sidebar_switches_page() {
    let model = create_test_model();
    assert_eq!(
        handle_mouse(click(3, 2), &model),
        Some(Message::SwitchPage("notes".to_string()))
    );
    assert_eq!(handle_mouse(click(3, 4), &model), Some(Message::StartNewPage));
}

#[test]
fn test_mouse_click_on_block_places_caret() {
    let model = create_test_model();
    let heading = model.session.blocks()[0].id;
    assert_eq!(
        handle_mouse(click(25, 1), &model),
        Some(Message::ClickBlock(heading, Some(2)))
    );
}

#[test]
fn test_mouse_click_below_blocks_focuses_last() {
    let model = create_test_model();
    let last = model.session.blocks()[1].id;
    assert_eq!(
        handle_mouse(click(30, 10), &model),
        Some(Message::ClickBlock(last, None))
    );
}

#[test]
fn test_mouse_wheel_scrolls() {
    let model = create_test_model();
    let mut wheel = click(30, 5);
    wheel.kind = MouseEventKind::ScrollDown;
    assert_eq!(handle_mouse(wheel, &model), Some(Message::ScrollDown(3)));
    wheel.kind = MouseEventKind::ScrollUp;
    assert_eq!(handle_mouse(wheel, &model), Some(Message::ScrollUp(3)));
}

#[test]
fn test_paste_event_becomes_message() {
    let model = create_test_model();
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(&Event::Paste("a\nb".into()), &model, 0, &mut debouncer);
    assert_eq!(msg, Some(Message::Paste("a\nb".into())));
}

#[test]
fn test_resize_event_is_debounced() {
    let model = create_test_model();
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(&Event::Resize(120, 40), &model, 0, &mut debouncer);
    assert!(msg.is_none());
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(100), Some((120, 40)));
}

#[test]
fn test_resize_debouncer_uses_latest_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(120, 40, 0);
    debouncer.queue(140, 50, 20);

    assert!(debouncer.take_ready(80).is_none());
    assert_eq!(debouncer.take_ready(120), Some((140, 50)));
}

// ---- session bootstrap -----------------------------------------------------

#[test]
fn test_open_session_persists_between_runs() {
    let dir = tempdir().unwrap();
    let app = App::new(dir.path().to_path_buf()).with_page(Some("journal".into()));

    let mut session = app.open_session();
    assert_eq!(session.active_key(), "journal");
    assert_eq!(session.focused_id(), Some(session.blocks()[0].id));
    assert_eq!(session.blocks()[0].content, "Welcome to Journal");
    session.import_markdown("# Day one");

    let reopened = app.open_session();
    assert_eq!(reopened.active_key(), "journal");
    assert_eq!(reopened.blocks()[0].content, "Day one");
    assert_eq!(reopened.blocks()[0].block_type, BlockType::Heading1);
    assert!(dir.path().join("notion-editor-pages.json").exists());
}
