use pretty_assertions::assert_eq;

use super::*;
use crate::db::{Database, SqliteNoteStore, SqliteTombstoneStore};
use crate::identity::SessionIdentity;
use crate::models::RemoteNote;
use crate::network::ConnectivityFlag;
use crate::remote::InMemoryRemote;

const USER: &str = "user-1";

type TestSync =
    NoteSync<SqliteNoteStore, SqliteTombstoneStore, InMemoryRemote, ConnectivityFlag, SessionIdentity>;

struct Harness {
    sync: TestSync,
    db: Database,
    remote: InMemoryRemote,
    network: ConnectivityFlag,
    identity: SessionIdentity,
}

async fn harness(online: bool, user: Option<&str>) -> Harness {
    let db = Database::open_in_memory().await.unwrap();
    let remote = InMemoryRemote::new();
    let network = ConnectivityFlag::new(online);
    let identity = SessionIdentity::new(user.map(str::to_string));
    let sync = NoteSync::new(
        db.notes(),
        db.tombstones(),
        remote.clone(),
        network.clone(),
        identity.clone(),
    );
    Harness {
        sync,
        db,
        remote,
        network,
        identity,
    }
}

fn note(id: i32, text: &str, date: &str) -> Note {
    let mut note = Note::new(text, date);
    note.id = NoteId::new(id);
    note
}

fn remote_note(id: i32, text: &str) -> RemoteNote {
    note(id, text, "2025-01-01").to_remote(USER)
}

/// Rows in the notes table, soft-deleted ones included
async fn raw_row_count(db: &Database) -> i64 {
    let conn = db.connection();
    let conn = conn.lock().await;
    conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
        .unwrap()
}

/// Break the local store with raw SQL to reach the local fault paths
async fn sabotage(db: &Database, sql: &str) {
    let conn = db.connection();
    let conn = conn.lock().await;
    conn.execute_batch(sql).unwrap();
}

fn failure_message(status: &NoteStatus) -> &str {
    match status {
        NoteStatus::Failure(Some(message)) => message,
        other => panic!("expected a failure with a message, got {other:?}"),
    }
}

async fn local_record(db: &Database, id: NoteId) -> LocalNote {
    db.notes().get_by_id(id).await.unwrap().unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_upsert_assigns_id_and_stays_unsynced() {
    let h = harness(false, Some(USER)).await;

    let result = h
        .sync
        .upsert(Note::new("buy milk", "2025-01-01"))
        .await;

    assert_eq!(result.status, NoteStatus::Success);
    assert_eq!(result.item.len(), 1);
    let saved = &result.item[0];
    assert!(!saved.id.is_unsaved());
    assert_eq!(saved.text, "buy milk");
    assert!(!local_record(&h.db, saved.id).await.is_synced);
    assert_eq!(h.remote.count(USER).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn online_edit_is_mirrored_and_marked_synced() {
    let h = harness(false, Some(USER)).await;
    let created = h
        .sync
        .upsert(Note::new("buy milk", "2025-01-01"))
        .await
        .item[0]
        .clone();

    h.network.set_online(true);
    let mut edited = created.clone();
    edited.text = "buy milk and eggs".to_string();
    let result = h.sync.upsert(edited).await;

    assert_eq!(result.status, NoteStatus::Success);
    assert_eq!(result.item[0].text, "buy milk and eggs");
    let local = local_record(&h.db, created.id).await;
    assert!(local.is_synced);
    assert_eq!(local.user_id.as_deref(), Some(USER));
    let remote = h.remote.get(USER, created.id).await.unwrap();
    assert_eq!(remote.text, "buy milk and eggs");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_by_id_on_empty_store_returns_placeholder() {
    let h = harness(true, Some(USER)).await;

    let result = h.sync.get_by_id(NoteId::new(999)).await;

    assert!(result.status.is_failure());
    assert_eq!(result.item, Note::placeholder());
    assert_eq!(result.item.id, NoteId::UNSAVED);
    assert_eq!(result.item.text, "");
    assert_eq!(result.item.date, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_is_durable_whatever_the_remote_outcome() {
    let cases = [(false, Some(USER), false), (true, None, false), (true, Some(USER), true)];

    for (online, user, remote_down) in cases {
        let h = harness(online, user).await;
        h.remote.set_unavailable(remote_down);

        let written = note(42, "kept locally", "2025-03-04");
        let result = h.sync.upsert(written.clone()).await;
        assert_eq!(result.status, NoteStatus::Success);

        h.network.set_online(false);
        let read = h.sync.get_by_id(written.id).await;
        assert_eq!(read.status, NoteStatus::Success);
        assert_eq!(read.item, written);
        assert!(!local_record(&h.db, written.id).await.is_synced);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn new_notes_get_distinct_nonzero_ids() {
    let h = harness(false, None).await;

    h.sync.upsert(Note::new("first", "2025-01-01")).await;
    let result = h.sync.upsert(Note::new("second", "2025-01-02")).await;

    assert_eq!(result.item.len(), 2);
    assert!(result.item.iter().all(|note| !note.id.is_unsaved()));
    assert_ne!(result.item[0].id, result.item[1].id);
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_delete_waits_for_full_sync() {
    let h = harness(true, Some(USER)).await;
    let id = NoteId::new(11);
    h.sync.upsert(note(11, "to delete", "2025-01-01")).await;
    assert!(h.remote.get(USER, id).await.is_some());

    h.network.set_online(false);
    let deleted = h.sync.delete(id).await;
    assert_eq!(deleted.status, NoteStatus::Success);
    assert!(deleted.item.is_empty());
    assert!(h.sync.get_all().await.item.is_empty());
    let tombstones = h.db.tombstones().get_all().await.unwrap();
    assert_eq!(tombstones.len(), 1);
    assert_eq!(tombstones[0].id, id);
    assert_eq!(raw_row_count(&h.db).await, 1);

    h.network.set_online(true);
    let synced = h.sync.full_sync().await;

    assert_eq!(synced.status, NoteStatus::Success);
    assert_eq!(raw_row_count(&h.db).await, 0);
    assert!(h.db.tombstones().get_all().await.unwrap().is_empty());
    assert!(h.remote.get(USER, id).await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_notes_converge_after_full_sync() {
    let h = harness(false, Some(USER)).await;
    for index in 1..=3 {
        h.sync
            .upsert(Note::new(format!("offline {index}"), "2025-02-01"))
            .await;
    }
    assert_eq!(h.db.notes().get_unsynced().await.unwrap().len(), 3);

    h.network.set_online(true);
    let result = h.sync.full_sync().await;

    assert_eq!(result.status, NoteStatus::Success);
    let pushed = result.item.pass(Pass::PushPending).unwrap();
    assert_eq!(pushed.attempted, 3);
    assert_eq!(pushed.succeeded, 3);
    assert!(h.db.notes().get_unsynced().await.unwrap().is_empty());
    assert_eq!(h.remote.count(USER).await, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn pull_overwrites_synced_local_copy() {
    let h = harness(true, Some(USER)).await;
    h.remote.insert(remote_note(5, "remote text")).await;
    let local = note(5, "local text", "2024-12-31")
        .to_local(Some(USER.to_string()))
        .synced();
    h.db.notes().upsert(&local).await.unwrap();

    let result = h.sync.full_sync().await;

    assert_eq!(result.status, NoteStatus::Success);
    let after = local_record(&h.db, NoteId::new(5)).await;
    assert_eq!(after, remote_note(5, "remote text").to_local());
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_deletion_is_pushed_before_pull() {
    let h = harness(false, Some(USER)).await;
    let id = NoteId::new(7);
    h.remote.insert(remote_note(7, "still remote")).await;
    h.db.notes()
        .upsert(&remote_note(7, "still remote").to_local())
        .await
        .unwrap();

    h.sync.delete(id).await;
    h.network.set_online(true);
    let result = h.sync.full_sync().await;

    assert_eq!(result.status, NoteStatus::Success);
    let passes: Vec<Pass> = result.item.passes.iter().map(|report| report.pass).collect();
    assert_eq!(
        passes,
        vec![Pass::PushPendingDeletions, Pass::PullRemote, Pass::PushPending]
    );
    let listed = h.sync.get_all().await;
    assert!(listed.item.iter().all(|note| note.id != id));
    assert!(h.remote.get(USER, id).await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_reports_pending_when_remote_rejects() {
    let h = harness(true, Some(USER)).await;
    let id = NoteId::new(21);
    h.sync.upsert(note(21, "stubborn", "2025-01-01")).await;
    h.remote.reject_id(id).await;

    let result = h.sync.delete(id).await;

    assert_eq!(result.status, NoteStatus::Deleted);
    assert!(result.item.is_empty());
    assert_eq!(h.db.tombstones().get_all().await.unwrap().len(), 1);
    assert!(h.remote.get(USER, id).await.is_some());

    h.remote.accept_id(id).await;
    let listed = h.sync.get_all().await;
    assert_eq!(listed.status, NoteStatus::Success);
    assert!(listed.item.is_empty());
    assert!(h.db.tombstones().get_all().await.unwrap().is_empty());
    assert!(h.remote.get(USER, id).await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn online_delete_removes_everywhere() {
    let h = harness(true, Some(USER)).await;
    let id = NoteId::new(3);
    h.sync.upsert(note(3, "gone soon", "2025-01-01")).await;

    let result = h.sync.delete(id).await;

    assert_eq!(result.status, NoteStatus::Success);
    assert_eq!(raw_row_count(&h.db).await, 0);
    assert!(h.db.tombstones().get_all().await.unwrap().is_empty());
    assert_eq!(h.remote.count(USER).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_all_pulls_remote_notes_in_date_order() {
    let h = harness(true, Some(USER)).await;
    h.remote
        .insert(note(1, "older", "2025-01-01").to_remote(USER))
        .await;
    h.remote
        .insert(note(2, "newer", "2025-06-01").to_remote(USER))
        .await;

    let result = h.sync.get_all().await;

    assert_eq!(result.status, NoteStatus::Success);
    let texts: Vec<&str> = result.item.iter().map(|note| note.text.as_str()).collect();
    assert_eq!(texts, vec!["newer", "older"]);
    assert!(h.db.notes().get_unsynced().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn get_all_reports_failed_pass_but_returns_local_list() {
    let h = harness(false, Some(USER)).await;
    h.sync.upsert(note(8, "local only", "2025-01-01")).await;

    h.network.set_online(true);
    h.remote.set_unavailable(true);
    let result = h.sync.get_all().await;

    assert!(result.status.is_failure());
    assert_eq!(result.item, vec![note(8, "local only", "2025-01-01")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_all_does_not_resurrect_pending_deletion() {
    let h = harness(false, Some(USER)).await;
    let id = NoteId::new(9);
    h.remote.insert(remote_note(9, "remote copy")).await;
    h.sync.delete(id).await;

    h.network.set_online(true);
    h.remote.reject_id(id).await;
    let result = h.sync.get_all().await;

    assert_eq!(result.status, NoteStatus::Success);
    assert!(result.item.is_empty());
    assert_eq!(h.db.tombstones().get_all().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_out_get_all_skips_reconciliation() {
    let h = harness(true, None).await;
    h.remote.insert(remote_note(1, "remote")).await;

    let result = h.sync.get_all().await;

    assert_eq!(result.status, NoteStatus::Success);
    assert!(result.item.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sync_requires_connection_and_identity() {
    let offline = harness(false, Some(USER)).await;
    let result = offline.sync.full_sync().await;
    assert_eq!(
        result.status,
        NoteStatus::failure(NO_CONNECTION_MESSAGE)
    );
    assert!(result.item.passes.is_empty());

    let signed_out = harness(true, None).await;
    let result = signed_out.sync.full_sync().await;
    assert_eq!(result.status, NoteStatus::failure(NOT_SIGNED_IN_MESSAGE));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sync_continues_past_item_failures() {
    let h = harness(false, Some(USER)).await;
    h.sync.upsert(note(1, "fine", "2025-01-01")).await;
    h.sync.upsert(note(2, "rejected", "2025-01-02")).await;

    h.network.set_online(true);
    h.remote.reject_id(NoteId::new(2)).await;
    let result = h.sync.full_sync().await;

    assert_eq!(result.status, NoteStatus::Success);
    assert_eq!(result.item.pending_failures(), 1);
    let pushed = result.item.pass(Pass::PushPending).unwrap();
    assert_eq!(pushed.failures[0].id, NoteId::new(2));
    assert!(h.remote.get(USER, NoteId::new(1)).await.is_some());
    let unsynced = h.db.notes().get_unsynced().await.unwrap();
    assert_eq!(unsynced.len(), 1);
    assert_eq!(unsynced[0].id, NoteId::new(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sync_pushes_pending_notes_when_pull_fails() {
    let h = harness(false, Some(USER)).await;
    let id = NoteId::new(12);
    h.sync.upsert(note(12, "written offline", "2025-01-01")).await;

    h.network.set_online(true);
    h.remote.set_fetch_unavailable(true);
    let result = h.sync.full_sync().await;

    assert_eq!(
        result.status,
        NoteStatus::failure(
            "Failed to pull remote notes: Remote store unavailable: GET timed out"
        )
    );
    let completed: Vec<Pass> = result.item.passes.iter().map(|report| report.pass).collect();
    assert_eq!(
        completed,
        vec![Pass::PushPendingDeletions, Pass::PushPending]
    );
    assert_eq!(result.item.failed_passes.len(), 1);
    assert_eq!(result.item.failed_passes[0].pass, Pass::PullRemote);
    assert!(h.remote.get(USER, id).await.is_some());
    assert!(h.db.notes().get_unsynced().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sync_reports_every_pass_when_remote_is_down() {
    let h = harness(true, Some(USER)).await;
    h.remote.set_unavailable(true);

    let result = h.sync.full_sync().await;

    assert!(result.status.is_failure());
    // nothing is pending, so only the pull has to reach the remote
    assert_eq!(result.item.passes.len(), 2);
    assert_eq!(result.item.failed_passes.len(), 1);
    assert_eq!(result.item.failed_passes[0].pass, Pass::PullRemote);
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_out_notes_are_claimed_on_sign_in() {
    let h = harness(true, None).await;
    h.sync.upsert(note(4, "anonymous", "2025-01-01")).await;
    assert_eq!(local_record(&h.db, NoteId::new(4)).await.user_id, None);

    h.identity.sign_in(USER);
    let result = h.sync.full_sync().await;

    assert_eq!(result.status, NoteStatus::Success);
    let local = local_record(&h.db, NoteId::new(4)).await;
    assert_eq!(local.user_id.as_deref(), Some(USER));
    assert!(local.is_synced);
    assert!(h.remote.get(USER, NoteId::new(4)).await.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_upsert_flushes_other_pending_notes() {
    let h = harness(false, Some(USER)).await;
    h.sync.upsert(note(1, "written offline", "2025-01-01")).await;

    h.network.set_online(true);
    h.sync.upsert(note(2, "written online", "2025-01-02")).await;

    assert!(h.db.notes().get_unsynced().await.unwrap().is_empty());
    assert_eq!(h.remote.count(USER).await, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn clear_local_data_leaves_remote_untouched() {
    let h = harness(true, Some(USER)).await;
    h.sync.upsert(note(1, "synced", "2025-01-01")).await;
    h.network.set_online(false);
    h.sync.upsert(note(2, "pending", "2025-01-02")).await;
    h.sync.delete(NoteId::new(1)).await;

    let result = h.sync.clear_local_data().await;

    assert_eq!(result.status, NoteStatus::Success);
    assert_eq!(raw_row_count(&h.db).await, 0);
    assert!(h.db.tombstones().get_all().await.unwrap().is_empty());
    assert_eq!(h.remote.count(USER).await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_reports_local_write_failure_with_current_list() {
    let h = harness(true, Some(USER)).await;
    h.sync.upsert(note(1, "already saved", "2025-01-01")).await;
    sabotage(
        &h.db,
        "CREATE TRIGGER reject_writes BEFORE INSERT ON notes
         BEGIN SELECT RAISE(ABORT, 'disk is full'); END;",
    )
    .await;

    let result = h.sync.upsert(note(2, "never stored", "2025-01-02")).await;

    assert!(failure_message(&result.status).contains("disk is full"));
    assert_eq!(result.item, vec![note(1, "already saved", "2025-01-01")]);
    assert!(h.remote.get(USER, NoteId::new(2)).await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_reports_local_failure_and_keeps_note() {
    let h = harness(false, Some(USER)).await;
    h.sync.upsert(note(3, "undeletable", "2025-01-01")).await;
    sabotage(
        &h.db,
        "CREATE TRIGGER reject_updates BEFORE UPDATE ON notes
         BEGIN SELECT RAISE(ABORT, 'database is locked'); END;",
    )
    .await;

    let result = h.sync.delete(NoteId::new(3)).await;

    assert!(failure_message(&result.status).contains("database is locked"));
    assert_eq!(result.item, vec![note(3, "undeletable", "2025-01-01")]);
    assert!(h.db.tombstones().get_all().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_store_fails_reads_with_empty_results() {
    let h = harness(false, Some(USER)).await;
    h.sync.upsert(note(4, "lost", "2025-01-01")).await;
    sabotage(&h.db, "DROP TABLE notes;").await;

    let listed = h.sync.get_all().await;
    assert!(listed.status.is_failure());
    assert!(listed.item.is_empty());

    let read = h.sync.get_by_id(NoteId::new(4)).await;
    assert!(!failure_message(&read.status).contains("not found"));
    assert_eq!(read.item, Note::placeholder());

    let saved = h.sync.upsert(note(5, "nowhere to go", "2025-01-02")).await;
    assert!(saved.status.is_failure());
    assert!(saved.item.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn clear_local_data_reports_partial_failure() {
    let h = harness(false, Some(USER)).await;
    h.sync.upsert(note(6, "cleared anyway", "2025-01-01")).await;
    sabotage(&h.db, "DROP TABLE deleted_notes;").await;

    let result = h.sync.clear_local_data().await;

    assert!(failure_message(&result.status).contains("deleted_notes"));
    assert_eq!(raw_row_count(&h.db).await, 0);
}
