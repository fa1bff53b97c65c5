//! Data models for Noting

mod list_item;
mod note;
mod status;

pub use list_item::{group_notes_by_month, NoteListItem};
pub use note::{LocalNote, Note, NoteId, RemoteNote, Tombstone};
pub use status::{NoteStatus, WithStatus};
