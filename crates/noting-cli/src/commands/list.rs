use noting_core::models::group_notes_by_month;
use noting_core::search::pinned_notes;
use noting_core::Note;

use crate::commands::common::{format_grouped_lines, format_note_lines, report_status, CliSync};
use crate::error::CliError;

pub async fn list_notes(sync: &CliSync, limit: usize, pinned_only: bool) -> Vec<Note> {
    let result = sync.get_all().await;
    report_status(&result.status);

    let notes = if pinned_only {
        pinned_notes(&result.item)
    } else {
        result.item
    };
    notes.into_iter().take(limit).collect()
}

pub async fn run_list(
    sync: &CliSync,
    limit: usize,
    pinned_only: bool,
    grouped: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let notes = list_notes(sync, limit, pinned_only).await;

    match (grouped, as_json) {
        (true, true) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&group_notes_by_month(&notes))?
            );
        }
        (true, false) => {
            for line in format_grouped_lines(&group_notes_by_month(&notes)) {
                println!("{line}");
            }
        }
        (false, true) => println!("{}", serde_json::to_string_pretty(&notes)?),
        (false, false) => {
            for line in format_note_lines(&notes) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
