//! Remote note store contract and implementations

mod memory;
mod supabase;

use thiserror::Error;

use crate::models::{NoteId, RemoteNote};

pub use memory::InMemoryRemote;
pub use supabase::{normalize_rest_url, SupabaseNoteClient};

/// Errors raised by a remote note store
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("No authenticated identity was supplied")]
    NotAuthenticated,
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {0}")]
    Api(String),
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Identity-scoped authoritative note table.
///
/// Every operation fails when `identity` is empty or does not own the row.
#[allow(async_fn_in_trait)]
pub trait RemoteNoteStore {
    /// Insert or replace the row keyed by (`identity`, `note.app_id`)
    async fn upsert(&self, note: &RemoteNote, identity: &str) -> RemoteResult<()>;

    /// Delete the row keyed by (`identity`, `id`)
    async fn delete_by_id(&self, id: NoteId, identity: &str) -> RemoteResult<()>;

    /// Every row owned by `identity`
    async fn get_all_by_identity(&self, identity: &str) -> RemoteResult<Vec<RemoteNote>>;
}

/// Reject blank identities before any remote call is made
pub fn require_identity(identity: &str) -> RemoteResult<&str> {
    let identity = identity.trim();
    if identity.is_empty() {
        Err(RemoteError::NotAuthenticated)
    } else {
        Ok(identity)
    }
}

/// Reject rows that `identity` does not own
pub fn require_owner(note: &RemoteNote, identity: &str) -> RemoteResult<()> {
    if note.user_id == identity {
        Ok(())
    } else {
        Err(RemoteError::Api(format!(
            "note {} is not owned by the current identity",
            note.app_id
        )))
    }
}

/// Remote store selected at runtime from configuration
#[derive(Clone, Debug)]
pub enum RemoteBackend {
    Supabase(SupabaseNoteClient),
    Memory(InMemoryRemote),
    /// No remote configured; every call fails
    Disabled,
}

impl RemoteNoteStore for RemoteBackend {
    async fn upsert(&self, note: &RemoteNote, identity: &str) -> RemoteResult<()> {
        match self {
            Self::Supabase(client) => client.upsert(note, identity).await,
            Self::Memory(store) => store.upsert(note, identity).await,
            Self::Disabled => Err(not_configured()),
        }
    }

    async fn delete_by_id(&self, id: NoteId, identity: &str) -> RemoteResult<()> {
        match self {
            Self::Supabase(client) => client.delete_by_id(id, identity).await,
            Self::Memory(store) => store.delete_by_id(id, identity).await,
            Self::Disabled => Err(not_configured()),
        }
    }

    async fn get_all_by_identity(&self, identity: &str) -> RemoteResult<Vec<RemoteNote>> {
        match self {
            Self::Supabase(client) => client.get_all_by_identity(identity).await,
            Self::Memory(store) => store.get_all_by_identity(identity).await,
            Self::Disabled => Err(not_configured()),
        }
    }
}

fn not_configured() -> RemoteError {
    RemoteError::Unavailable("no remote store is configured".to_string())
}
