//! Blocknote - a block-based note editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! blocknote
//! blocknote --page ideas
//! blocknote --page notes --export-markdown > notes.md
//! blocknote --page notes --import notes.md
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blocknote::app::App;
use blocknote::config::{
    ConfigFlags, clear_config_flags, default_store_dir, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use blocknote::session::{DEFAULT_SAVE_DELAY_MS, Session};
use blocknote::store::FileStore;

/// A block-based note editor for the terminal
#[derive(Parser, Debug)]
#[command(name = "blocknote", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Directory pages are stored in
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Page to open (created if it does not exist)
    #[arg(long, value_name = "NAME")]
    page: Option<String>,

    /// Directory share artifacts are written into
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Quiet period in milliseconds before edits are saved
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Write logs to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the page as markdown and exit
    #[arg(long, conflicts_with = "import")]
    export_markdown: bool,

    /// Replace the page with a markdown file, save, and exit
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn open_session(store_dir: PathBuf, page: Option<&str>) -> Session {
    let mut session = Session::new(Box::new(FileStore::new(store_dir)));
    if let Some(page) = page {
        session.set_active_page(page);
    }
    session.load();
    session
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref())?;

    let store_dir = effective.store.clone().unwrap_or_else(default_store_dir);
    tracing::debug!(store = %store_dir.display(), ?effective, "configuration resolved");

    // Headless modes
    if cli.export_markdown {
        let session = open_session(store_dir, effective.page.as_deref());
        print!("{}", session.export_markdown());
        return Ok(());
    }
    if let Some(path) = &cli.import {
        let markdown = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut session = open_session(store_dir, effective.page.as_deref());
        let count = session.replace_with_markdown(&markdown);
        if !session.save() {
            anyhow::bail!("Failed to save imported page (see log)");
        }
        eprintln!("Imported {count} block(s) into {}", session.active_key());
        return Ok(());
    }

    // Run the application
    let mut app = App::new(store_dir)
        .with_page(effective.page.clone())
        .with_export_dir(effective.export_dir.clone().unwrap_or_else(|| PathBuf::from(".")))
        .with_debounce_ms(effective.debounce_ms.unwrap_or(DEFAULT_SAVE_DELAY_MS))
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
