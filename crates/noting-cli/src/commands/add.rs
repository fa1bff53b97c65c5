use noting_core::Note;

use crate::commands::common::{ensure_saved, resolve_note_content, CliSync};
use crate::error::CliError;

pub async fn run_add(
    sync: &CliSync,
    content_parts: &[String],
    date: Option<&str>,
    pin: bool,
) -> Result<Note, CliError> {
    let text = resolve_note_content(content_parts)?;
    let mut note = match date.map(str::trim).filter(|date| !date.is_empty()) {
        Some(date) => Note::new(text, date),
        None => Note::today(text),
    }
    .with_assigned_id();
    note.is_pinned = pin;

    let result = sync.upsert(note.clone()).await;
    ensure_saved(&result.status)?;

    println!("{}", note.id);
    Ok(note)
}
