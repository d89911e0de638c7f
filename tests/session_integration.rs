use blocknote::document::BlockType;
use blocknote::session::{Command, CommandOutcome, Key, KeyInput, KeyOutcome, Session};
use blocknote::store::{FileStore, KeyValueStore, PAGES_KEY};

fn open(dir: &std::path::Path) -> Session {
    let mut session = Session::new(Box::new(FileStore::new(dir)));
    session.load();
    session
}

#[test]
fn test_edits_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());

    let paragraph = session.blocks()[1].id;
    session.click_block(paragraph, None);
    assert_eq!(
        session.handle_key(KeyInput::plain(Key::Enter)),
        KeyOutcome::Handled(blocknote::session::KeyAction::SplitBlock)
    );
    session.insert_text("shopping");
    session.execute(Command::SetType(BlockType::BulletedItem));
    assert_eq!(session.execute(Command::Save), CommandOutcome::Saved);

    let reopened = open(dir.path());
    let blocks = reopened.blocks();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[2].block_type, BlockType::BulletedItem);
    assert_eq!(blocks[2].content, "shopping");
}

#[test]
fn test_debounced_input_saves_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).with_save_delay(200);
    let heading = session.blocks()[0].id;
    session.click_block(heading, None);

    for (i, c) in "!!!".chars().enumerate() {
        let now = u64::try_from(i).unwrap() * 50;
        session.insert_text(&c.to_string());
        session.note_input(now);
        assert!(!session.tick(now));
    }
    let store = FileStore::new(dir.path());
    assert_eq!(store.get(PAGES_KEY).unwrap(), None);

    assert!(session.tick(300));
    let saved = store.get(PAGES_KEY).unwrap().unwrap();
    assert!(saved.contains("Welcome to Main!!!"));
    assert!(!session.save_pending());
}

#[test]
fn test_pages_are_stored_together() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session.switch_page("notes");
    session.import_markdown("- milk\n- eggs");
    assert_eq!(session.create_page("Road Map").as_deref(), Some("road map"));

    let stored = FileStore::new(dir.path()).get(PAGES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let map = value.as_object().unwrap();
    assert!(map.contains_key("main"));
    assert!(map.contains_key("road map"));
    assert_eq!(map["notes"][0]["type"], "ul");
    assert_eq!(map["notes"][1]["content"], "eggs");

    let reopened = open(dir.path());
    let keys: Vec<_> = reopened.pages().iter().map(|p| p.key.as_str()).collect();
    assert!(keys.contains(&"road map"));
}

#[test]
fn test_markdown_round_trip_through_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    let md = "# Plan\n\n## Week one\n\n- read\n1. write\n> ship it\n\nDone.\n\n";
    assert_eq!(session.import_markdown(md), 6);
    assert_eq!(session.export_markdown(), md);

    let artifact = session.export_artifact();
    assert_eq!(artifact.file_name, "main-content.html");
    assert!(artifact.contents.contains("data-type=\"quote\""));
}

#[test]
fn test_corrupt_store_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set(PAGES_KEY, "{ not json").unwrap();

    let session = open(dir.path());
    assert_eq!(session.blocks().len(), 2);
    assert_eq!(session.blocks()[0].content, "Welcome to Main");
}
