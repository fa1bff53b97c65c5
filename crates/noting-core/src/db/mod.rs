//! Local database layer for Noting

mod connection;
mod migrations;
mod note_store;
mod tombstone_store;

pub use connection::{Database, SharedConnection};
pub use note_store::{NoteStore, SqliteNoteStore};
pub use tombstone_store::{SqliteTombstoneStore, TombstoneStore};
