use noting_core::util::today_date_string;
use noting_core::Note;

use crate::commands::common::{
    capture_editor_input_with_initial, ensure_saved, normalize_content, parse_note_id,
    require_note, CliSync,
};
use crate::error::CliError;

pub async fn run_edit(sync: &CliSync, id: &str, text_parts: &[String]) -> Result<Note, CliError> {
    let note = require_note(sync, parse_note_id(id)?).await?;

    let edited_text = match normalize_content(&text_parts.join(" ")) {
        Some(text) => text,
        None => capture_editor_input_with_initial(&note.text)?
            .ok_or(CliError::EmptyEditedContent)?,
    };

    if edited_text == note.text {
        println!("{}", note.id);
        return Ok(note);
    }

    let updated = Note {
        text: edited_text,
        date: today_date_string(),
        ..note
    };
    let result = sync.upsert(updated.clone()).await;
    ensure_saved(&result.status)?;

    println!("{}", updated.id);
    Ok(updated)
}
