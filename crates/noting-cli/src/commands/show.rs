use crate::commands::common::{parse_note_id, require_note, CliSync};
use crate::error::CliError;

pub async fn run_show(sync: &CliSync, id: &str) -> Result<(), CliError> {
    let note = require_note(sync, parse_note_id(id)?).await?;

    let pinned = if note.is_pinned { "  [pinned]" } else { "" };
    println!("{}  {}{pinned}", note.id, note.date);
    println!();
    println!("{}", note.text);
    Ok(())
}
