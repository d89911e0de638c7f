use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

use crate::app::{App, Message, Model, ToastLevel};
use crate::document::ExportArtifact;
use base64::Engine;

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::Command(_) => {
                if let Some(artifact) = model.pending_export.take() {
                    match write_artifact(&model.export_dir, &artifact) {
                        Ok(path) => {
                            tracing::info!(path = %path.display(), "page exported");
                            model.show_toast(ToastLevel::Info, "Content exported!");
                        }
                        Err(err) => {
                            tracing::warn!(file = %artifact.file_name, %err, "export failed");
                            model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
                        }
                    }
                }
            }
            Message::CopyMarkdown => {
                let markdown = model.session.export_markdown();
                match copy_to_clipboard(&markdown) {
                    Ok(()) => model.show_toast(
                        ToastLevel::Info,
                        format!("Copied {} line(s) of markdown", markdown.lines().count()),
                    ),
                    Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
                }
            }
            _ => {}
        }
    }
}

/// Write a share artifact into `dir`, creating the directory if needed.
pub(super) fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.contents)?;
    Ok(path)
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
