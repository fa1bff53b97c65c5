use std::io;

use noting_core::remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] noting_core::Error),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note text provided")]
    EmptyContent,
    #[error("Edited note text cannot be empty")]
    EmptyEditedContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Invalid note ID '{0}': expected an integer")]
    InvalidNoteId(String),
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Failed to save note: {0}")]
    SaveFailed(String),
    #[error("Failed to delete note: {0}")]
    DeleteFailed(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Sync failed: {0}")]
    Sync(String),
}
