use crate::document::inline::Format;
use crate::document::{BlockType, ExportArtifact};

use super::Session;

/// Editor commands, as issued from a toolbar or command palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    SetType(BlockType),
    Save,
    Share,
}

/// Result of executing a [`Command`] that the host may need to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// Pages were written to the store.
    Saved,
    /// Pages could not be written; the failure has been logged.
    SaveFailed,
    /// The host should deliver this file to the user.
    Exported(ExportArtifact),
}

impl CommandOutcome {
    /// Notification the host should show, if any.
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Saved => Some("Content saved!"),
            Self::Exported(_) => Some("Content exported!"),
            Self::Done | Self::SaveFailed => None,
        }
    }
}

impl Session {
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        tracing::debug!(?command, "execute");
        match command {
            Command::Bold => {
                self.toggle_format(Format::Bold);
            }
            Command::Italic => {
                self.toggle_format(Format::Italic);
            }
            Command::Underline => {
                self.toggle_format(Format::Underline);
            }
            Command::SetType(block_type) => {
                self.change_block_type(block_type);
            }
            Command::Save => {
                return if self.save() {
                    CommandOutcome::Saved
                } else {
                    CommandOutcome::SaveFailed
                };
            }
            Command::Share => return CommandOutcome::Exported(self.export_artifact()),
        }
        CommandOutcome::Done
    }
}
