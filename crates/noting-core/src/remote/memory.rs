//! In-process remote note store

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{require_identity, require_owner, RemoteError, RemoteNoteStore, RemoteResult};
use crate::models::{NoteId, RemoteNote};

#[derive(Default)]
struct MemoryState {
    rows: BTreeMap<(String, NoteId), RemoteNote>,
    rejected_ids: HashSet<NoteId>,
}

/// Remote store kept in memory, keyed by (owner, `app_id`).
///
/// Clones share the same rows. Failures can be injected for the whole store
/// or for single ids, which is how tests simulate flaky connectivity.
#[derive(Clone, Default)]
pub struct InMemoryRemote {
    state: Arc<Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
    fetch_unavailable: Arc<AtomicBool>,
}

impl std::fmt::Debug for InMemoryRemote {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("InMemoryRemote")
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .field(
                "fetch_unavailable",
                &self.fetch_unavailable.load(Ordering::SeqCst),
            )
            .finish_non_exhaustive()
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only `get_all_by_identity` fail; writes and deletes still land
    pub fn set_fetch_unavailable(&self, unavailable: bool) {
        self.fetch_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make calls touching `id` fail
    pub async fn reject_id(&self, id: NoteId) {
        self.state.lock().await.rejected_ids.insert(id);
    }

    /// Stop failing calls touching `id`
    pub async fn accept_id(&self, id: NoteId) {
        self.state.lock().await.rejected_ids.remove(&id);
    }

    /// Seed a row directly, bypassing failure injection
    pub async fn insert(&self, note: RemoteNote) {
        let key = (note.user_id.clone(), note.app_id);
        self.state.lock().await.rows.insert(key, note);
    }

    /// Row for (`identity`, `id`), if any
    pub async fn get(&self, identity: &str, id: NoteId) -> Option<RemoteNote> {
        self.state
            .lock()
            .await
            .rows
            .get(&(identity.to_string(), id))
            .cloned()
    }

    /// Number of rows owned by `identity`
    pub async fn count(&self, identity: &str) -> usize {
        self.state
            .lock()
            .await
            .rows
            .keys()
            .filter(|(owner, _)| owner == identity)
            .count()
    }

    fn check_available(&self) -> RemoteResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("remote store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_accepted(state: &MemoryState, id: NoteId) -> RemoteResult<()> {
        if state.rejected_ids.contains(&id) {
            Err(RemoteError::Api(format!("note {id} was rejected")))
        } else {
            Ok(())
        }
    }
}

impl RemoteNoteStore for InMemoryRemote {
    async fn upsert(&self, note: &RemoteNote, identity: &str) -> RemoteResult<()> {
        let identity = require_identity(identity)?;
        require_owner(note, identity)?;
        self.check_available()?;

        let mut state = self.state.lock().await;
        Self::check_accepted(&state, note.app_id)?;
        state
            .rows
            .insert((identity.to_string(), note.app_id), note.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: NoteId, identity: &str) -> RemoteResult<()> {
        let identity = require_identity(identity)?;
        self.check_available()?;

        let mut state = self.state.lock().await;
        Self::check_accepted(&state, id)?;
        state.rows.remove(&(identity.to_string(), id));
        Ok(())
    }

    async fn get_all_by_identity(&self, identity: &str) -> RemoteResult<Vec<RemoteNote>> {
        let identity = require_identity(identity)?;
        self.check_available()?;
        if self.fetch_unavailable.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("GET timed out".to_string()));
        }

        let state = self.state.lock().await;
        Ok(state
            .rows
            .iter()
            .filter(|((owner, _), _)| owner == identity)
            .map(|(_, note)| note.clone())
            .collect())
    }
}
