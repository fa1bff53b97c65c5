//! Local note table

use rusqlite::{params, OptionalExtension, Row};

use super::SharedConnection;
use crate::error::Result;
use crate::models::{LocalNote, NoteId};

const NOTE_COLUMNS: &str = "id, text, date, user_id, is_pinned, is_synced, is_deleted";

/// Trait for local note storage operations (async)
#[allow(async_fn_in_trait)]
pub trait NoteStore {
    /// Insert or fully replace a note by id
    async fn upsert(&self, note: &LocalNote) -> Result<()>;

    /// All notes that are not soft-deleted, newest `date` first
    async fn get_all(&self) -> Result<Vec<LocalNote>>;

    /// Get a note that is not soft-deleted
    async fn get_by_id(&self, id: NoteId) -> Result<Option<LocalNote>>;

    /// Soft delete a note
    async fn mark_deleted(&self, id: NoteId) -> Result<()>;

    /// Physically remove a note, deleted or not
    async fn hard_delete(&self, id: NoteId) -> Result<()>;

    /// Notes not yet mirrored remotely, excluding soft-deleted ones
    async fn get_unsynced(&self) -> Result<Vec<LocalNote>>;

    /// Remove every note
    async fn clear_all(&self) -> Result<()>;
}

/// `SQLite` implementation of `NoteStore`
#[derive(Clone)]
pub struct SqliteNoteStore {
    conn: SharedConnection,
}

impl SqliteNoteStore {
    /// Create a store over the given connection
    pub const fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &Row<'_>) -> rusqlite::Result<LocalNote> {
        Ok(LocalNote {
            id: NoteId::new(row.get(0)?),
            text: row.get(1)?,
            date: row.get(2)?,
            user_id: row.get(3)?,
            is_pinned: row.get::<_, i32>(4)? != 0,
            is_synced: row.get::<_, i32>(5)? != 0,
            is_deleted: row.get::<_, i32>(6)? != 0,
        })
    }

    async fn query_notes(&self, filter: &str) -> Result<Vec<LocalNote>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes {filter}"))?;
        let notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }
}

impl NoteStore for SqliteNoteStore {
    async fn upsert(&self, note: &LocalNote) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO notes (id, text, date, user_id, is_pinned, is_synced, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                text = excluded.text,
                date = excluded.date,
                user_id = excluded.user_id,
                is_pinned = excluded.is_pinned,
                is_synced = excluded.is_synced,
                is_deleted = excluded.is_deleted",
            params![
                note.id.get(),
                note.text,
                note.date,
                note.user_id,
                i32::from(note.is_pinned),
                i32::from(note.is_synced),
                i32::from(note.is_deleted)
            ],
        )?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<LocalNote>> {
        self.query_notes("WHERE is_deleted = 0 ORDER BY date DESC, id DESC")
            .await
    }

    async fn get_by_id(&self, id: NoteId) -> Result<Option<LocalNote>> {
        let conn = self.conn.lock().await;
        let note = conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ? AND is_deleted = 0"),
                params![id.get()],
                Self::parse_note,
            )
            .optional()?;
        Ok(note)
    }

    async fn mark_deleted(&self, id: NoteId) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE notes SET is_deleted = 1 WHERE id = ?",
            params![id.get()],
        )?;
        Ok(())
    }

    async fn hard_delete(&self, id: NoteId) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM notes WHERE id = ?", params![id.get()])?;
        Ok(())
    }

    async fn get_unsynced(&self) -> Result<Vec<LocalNote>> {
        self.query_notes("WHERE is_synced = 0 AND is_deleted = 0 ORDER BY date DESC, id DESC")
            .await
    }

    async fn clear_all(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM notes", [])?;
        Ok(())
    }
}
