use noting_core::Note;

use crate::commands::common::{ensure_saved, parse_note_id, require_note, CliSync};
use crate::error::CliError;

pub async fn run_pin(sync: &CliSync, id: &str) -> Result<Note, CliError> {
    let toggled = require_note(sync, parse_note_id(id)?).await?.toggled_pin();

    let result = sync.upsert(toggled.clone()).await;
    ensure_saved(&result.status)?;

    let state = if toggled.is_pinned { "pinned" } else { "unpinned" };
    println!("{} {state}", toggled.id);
    Ok(toggled)
}
