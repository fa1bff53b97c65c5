//! Offline-first reconciliation between the local store and the remote store.
//!
//! Local writes always land first and are never rolled back. Remote work is
//! best-effort: whatever could not be mirrored stays recorded in the local
//! store (`is_synced = 0` rows and tombstones) and is retried by the next
//! reconciliation pass.

mod report;

#[cfg(test)]
mod tests;

use crate::db::{NoteStore, TombstoneStore};
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::models::{LocalNote, Note, NoteId, NoteStatus, WithStatus};
use crate::network::Connectivity;
use crate::remote::RemoteNoteStore;

pub use report::{ItemFailure, Pass, PassError, PassFailure, PassReport, SyncReport};

pub const NO_CONNECTION_MESSAGE: &str = "No internet connection";
pub const NOT_SIGNED_IN_MESSAGE: &str = "User is not signed in";

type PassResult = std::result::Result<PassReport, PassError>;

/// Note operations that keep the local store and the remote store consistent.
///
/// Holds no state between calls; every operation re-derives pending work from
/// the stores.
pub struct NoteSync<N, T, R, C, I> {
    notes: N,
    tombstones: T,
    remote: R,
    connectivity: C,
    identity: I,
}

impl<N, T, R, C, I> NoteSync<N, T, R, C, I>
where
    N: NoteStore,
    T: TombstoneStore,
    R: RemoteNoteStore,
    C: Connectivity,
    I: IdentityProvider,
{
    pub const fn new(notes: N, tombstones: T, remote: R, connectivity: C, identity: I) -> Self {
        Self {
            notes,
            tombstones,
            remote,
            connectivity,
            identity,
        }
    }

    /// Identity to reconcile for, or `None` when offline or signed out
    fn online_identity(&self) -> Option<String> {
        if !self.connectivity.is_online() {
            return None;
        }
        self.identity.current_identity_id()
    }

    async fn local_notes(&self) -> Result<Vec<Note>> {
        let notes = self.notes.get_all().await?;
        Ok(notes.iter().map(LocalNote::to_note).collect())
    }

    /// Re-read after a failed operation; an unreadable store yields nothing
    async fn local_notes_or_empty(&self) -> Vec<Note> {
        self.local_notes().await.unwrap_or_else(|error| {
            tracing::warn!("Failed to re-read local notes: {error}");
            Vec::new()
        })
    }

    /// Save `note` locally, then mirror it remotely when possible.
    ///
    /// A note with the unsaved id gets a fresh random id. A failed remote push
    /// still reports success; the note stays pending.
    pub async fn upsert(&self, note: Note) -> WithStatus<Vec<Note>> {
        match self.try_upsert(note).await {
            Ok(notes) => WithStatus::success(notes),
            Err(error) => {
                tracing::warn!("Failed to save note locally: {error}");
                WithStatus::failure(self.local_notes_or_empty().await, error.to_string())
            }
        }
    }

    async fn try_upsert(&self, note: Note) -> Result<Vec<Note>> {
        let note = note.with_assigned_id();
        let identity = self.identity.current_identity_id();
        let local = note.to_local(identity.clone());
        self.notes.upsert(&local).await?;
        tracing::debug!("Saved note {} locally", note.id);

        if let Some(identity) = identity.filter(|_| self.connectivity.is_online()) {
            match self.remote.upsert(&note.to_remote(&identity), &identity).await {
                Ok(()) => {
                    self.notes.upsert(&local.synced()).await?;
                    if let Err(error) = self.push_pending(&identity).await {
                        tracing::warn!("Pushing pending notes after save failed: {error}");
                    }
                }
                Err(error) => {
                    tracing::warn!("Note {} left pending: {error}", note.id);
                }
            }
        }

        self.local_notes().await
    }

    /// Soft delete `id` and propagate the deletion when possible.
    ///
    /// Reports [`NoteStatus::Deleted`] when the remote deletion was attempted
    /// and failed; the tombstone keeps it pending.
    pub async fn delete(&self, id: NoteId) -> WithStatus<Vec<Note>> {
        match self.try_delete(id).await {
            Ok((notes, status)) => WithStatus::new(notes, status),
            Err(error) => {
                tracing::warn!("Failed to delete note {id}: {error}");
                WithStatus::failure(self.local_notes_or_empty().await, error.to_string())
            }
        }
    }

    async fn try_delete(&self, id: NoteId) -> Result<(Vec<Note>, NoteStatus)> {
        self.notes.mark_deleted(id).await?;
        self.tombstones.insert(id).await?;

        let status = match self.online_identity() {
            Some(identity) => match self.remote.delete_by_id(id, &identity).await {
                Ok(()) => {
                    self.notes.hard_delete(id).await?;
                    self.tombstones.delete_by_id(id).await?;
                    NoteStatus::Success
                }
                Err(error) => {
                    tracing::warn!("Deletion of note {id} left pending: {error}");
                    NoteStatus::Deleted
                }
            },
            None => NoteStatus::Success,
        };

        Ok((self.local_notes().await?, status))
    }

    /// Reconcile when online and signed in, then list the local notes.
    ///
    /// A pass that could not run at all turns the status into a failure; the
    /// local list is returned either way.
    pub async fn get_all(&self) -> WithStatus<Vec<Note>> {
        let mut failed = Vec::new();

        if let Some(identity) = self.online_identity() {
            let passes = [
                (Pass::PullRemote, self.pull_remote(&identity).await),
                (Pass::PushPending, self.push_pending(&identity).await),
                (
                    Pass::PushPendingDeletions,
                    self.push_pending_deletions(&identity).await,
                ),
            ];
            for (pass, result) in passes {
                if let Err(error) = result {
                    tracing::warn!("Failed to {pass}: {error}");
                    failed.push(format!("failed to {pass}: {error}"));
                }
            }
        }

        match self.local_notes().await {
            Ok(notes) if failed.is_empty() => WithStatus::success(notes),
            Ok(notes) => WithStatus::failure(notes, failed.join("; ")),
            Err(error) => {
                tracing::warn!("Failed to read local notes: {error}");
                WithStatus::failure(Vec::new(), error.to_string())
            }
        }
    }

    /// Read one note from the local store only.
    ///
    /// A missing note yields [`Note::placeholder`] with a failure status.
    pub async fn get_by_id(&self, id: NoteId) -> WithStatus<Note> {
        match self.notes.get_by_id(id).await {
            Ok(Some(local)) => WithStatus::success(local.to_note()),
            Ok(None) => WithStatus::failure(Note::placeholder(), format!("Note {id} not found")),
            Err(error) => {
                tracing::warn!("Failed to read note {id}: {error}");
                WithStatus::failure(Note::placeholder(), error.to_string())
            }
        }
    }

    /// Explicit full reconciliation: deletions, then pull, then pending pushes.
    ///
    /// Unlike [`Self::get_all`] this reports being offline or signed out. Every
    /// pass runs even when an earlier one fails; pass-level errors end up in
    /// the report and turn the status into a failure.
    pub async fn full_sync(&self) -> WithStatus<SyncReport> {
        let mut report = SyncReport::default();

        if !self.connectivity.is_online() {
            return WithStatus::failure(report, NO_CONNECTION_MESSAGE);
        }
        let Some(identity) = self.identity.current_identity_id() else {
            return WithStatus::failure(report, NOT_SIGNED_IN_MESSAGE);
        };

        for pass in [
            Pass::PushPendingDeletions,
            Pass::PullRemote,
            Pass::PushPending,
        ] {
            let result = match pass {
                Pass::PushPendingDeletions => self.push_pending_deletions(&identity).await,
                Pass::PullRemote => self.pull_remote(&identity).await,
                Pass::PushPending => self.push_pending(&identity).await,
            };
            if let Err(error) = &result {
                tracing::warn!("Full sync could not {pass}: {error}");
            }
            report.record(pass, result);
        }

        tracing::info!(
            "Full sync finished with {} item(s) still pending",
            report.pending_failures()
        );
        match report.failure_message() {
            Some(message) => WithStatus::failure(report, message),
            None => WithStatus::success(report),
        }
    }

    /// Empty the local notes and tombstones; the remote store is untouched
    pub async fn clear_local_data(&self) -> WithStatus<()> {
        let mut failed = Vec::new();
        if let Err(error) = self.notes.clear_all().await {
            tracing::warn!("Failed to clear local notes: {error}");
            failed.push(error.to_string());
        }
        if let Err(error) = self.tombstones.clear_all().await {
            tracing::warn!("Failed to clear pending deletions: {error}");
            failed.push(error.to_string());
        }

        if failed.is_empty() {
            tracing::info!("Cleared local note data");
            WithStatus::success(())
        } else {
            WithStatus::failure((), failed.join("; "))
        }
    }

    /// Overwrite local copies with every remote row of `identity`.
    ///
    /// Rows whose deletion is still pending locally are skipped so the pull
    /// cannot bring them back.
    async fn pull_remote(&self, identity: &str) -> PassResult {
        let mut report = PassReport::new(Pass::PullRemote);
        let remote_notes = self.remote.get_all_by_identity(identity).await?;
        let pending_deletions = self.tombstones.get_all().await?;

        for remote in remote_notes {
            if pending_deletions
                .iter()
                .any(|tombstone| tombstone.id == remote.app_id)
            {
                tracing::debug!("Skipping pulled note {}, deletion pending", remote.app_id);
                continue;
            }
            self.notes.upsert(&remote.to_local()).await?;
            report.record_success();
        }

        tracing::info!("Pulled {} remote note(s)", report.succeeded);
        Ok(report)
    }

    /// Push every unsynced local note; failures stay pending
    async fn push_pending(&self, identity: &str) -> PassResult {
        let mut report = PassReport::new(Pass::PushPending);

        for local in self.notes.get_unsynced().await? {
            let claimed = local.claimed_by(identity);
            match self.remote.upsert(&claimed.to_remote(), identity).await {
                Ok(()) => {
                    self.notes.upsert(&claimed.synced()).await?;
                    report.record_success();
                }
                Err(error) => {
                    tracing::debug!("Note {} still pending: {error}", local.id);
                    report.record_failure(local.id, &error);
                }
            }
        }

        if report.attempted > 0 {
            tracing::info!(
                "Pushed {}/{} pending note(s)",
                report.succeeded,
                report.attempted
            );
        }
        Ok(report)
    }

    /// Propagate every tombstone; confirmed deletions are removed locally
    async fn push_pending_deletions(&self, identity: &str) -> PassResult {
        let mut report = PassReport::new(Pass::PushPendingDeletions);

        for tombstone in self.tombstones.get_all().await? {
            match self.remote.delete_by_id(tombstone.id, identity).await {
                Ok(()) => {
                    self.notes.hard_delete(tombstone.id).await?;
                    self.tombstones.delete_by_id(tombstone.id).await?;
                    report.record_success();
                }
                Err(error) => {
                    tracing::debug!("Deletion of note {} still pending: {error}", tombstone.id);
                    report.record_failure(tombstone.id, &error);
                }
            }
        }

        if report.attempted > 0 {
            tracing::info!(
                "Propagated {}/{} pending deletion(s)",
                report.succeeded,
                report.attempted
            );
        }
        Ok(report)
    }
}
