//! In-memory filtering over the notes returned by a sync operation

use crate::models::Note;

/// Notes matching `query` (case-insensitive on text or date), order preserved.
///
/// A blank query returns every note.
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| note.matches_query(query))
        .cloned()
        .collect()
}

/// The pinned subset, order preserved
pub fn pinned_notes(notes: &[Note]) -> Vec<Note> {
    notes.iter().filter(|note| note.is_pinned).cloned().collect()
}
