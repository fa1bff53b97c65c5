//! Database connection management

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use super::{migrations, SqliteNoteStore, SqliteTombstoneStore};
use crate::error::Result;

/// Connection shared by every store handle opened from one [`Database`]
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Local `SQLite` database holding notes and deletion tombstones
#[derive(Clone)]
pub struct Database {
    conn: SharedConnection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::prepare(&conn)?;
        tracing::debug!("Opened local note database at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn prepare(conn: &Connection) -> Result<()> {
        Self::configure(conn)?;
        migrations::run(conn)
    }

    /// Configure `SQLite` for optimal performance
    fn configure(conn: &Connection) -> Result<()> {
        // journal_mode reports the resulting mode; in-memory databases stay "memory"
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    /// Get a handle to the shared connection
    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    /// Note table handle
    pub fn notes(&self) -> SqliteNoteStore {
        SqliteNoteStore::new(self.connection())
    }

    /// Tombstone table handle
    pub fn tombstones(&self) -> SqliteTombstoneStore {
        SqliteTombstoneStore::new(self.connection())
    }
}
