//! Pending-deletion tombstones

use rusqlite::params;

use super::SharedConnection;
use crate::error::Result;
use crate::models::{NoteId, Tombstone};
use crate::util::unix_timestamp_millis;

/// Trait for tombstone storage operations (async)
#[allow(async_fn_in_trait)]
pub trait TombstoneStore {
    /// Record that `id` must still be deleted remotely. Re-inserting refreshes it.
    async fn insert(&self, id: NoteId) -> Result<()>;

    /// Every pending deletion, oldest first
    async fn get_all(&self) -> Result<Vec<Tombstone>>;

    /// Forget a pending deletion
    async fn delete_by_id(&self, id: NoteId) -> Result<()>;

    /// Forget every pending deletion
    async fn clear_all(&self) -> Result<()>;
}

/// `SQLite` implementation of `TombstoneStore`
#[derive(Clone)]
pub struct SqliteTombstoneStore {
    conn: SharedConnection,
}

impl SqliteTombstoneStore {
    /// Create a store over the given connection
    pub const fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl TombstoneStore for SqliteTombstoneStore {
    async fn insert(&self, id: NoteId) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO deleted_notes (id, deleted_at) VALUES (?, ?)",
            params![id.get(), unix_timestamp_millis()],
        )?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Tombstone>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, deleted_at FROM deleted_notes ORDER BY deleted_at ASC, id ASC")?;
        let tombstones = stmt
            .query_map([], |row| {
                Ok(Tombstone {
                    id: NoteId::new(row.get(0)?),
                    deleted_at: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tombstones)
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM deleted_notes WHERE id = ?", params![id.get()])?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM deleted_notes", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> SqliteTombstoneStore {
        Database::open_in_memory().await.unwrap().tombstones()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_and_list() {
        let store = setup().await;
        store.insert(NoteId::new(3)).await.unwrap();
        store.insert(NoteId::new(4)).await.unwrap();

        let ids = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|tombstone| tombstone.id)
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&NoteId::new(3)));
        assert!(ids.contains(&NoteId::new(4)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_is_idempotent() {
        let store = setup().await;
        store.insert(NoteId::new(3)).await.unwrap();
        store.insert(NoteId::new(3)).await.unwrap();

        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_by_id_and_clear() {
        let store = setup().await;
        store.insert(NoteId::new(1)).await.unwrap();
        store.insert(NoteId::new(2)).await.unwrap();

        store.delete_by_id(NoteId::new(1)).await.unwrap();
        let remaining = store.get_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, NoteId::new(2));
        assert!(remaining[0].deleted_at > 0);

        store.clear_all().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
