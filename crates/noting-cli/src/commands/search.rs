use noting_core::search::filter_notes;
use noting_core::Note;

use crate::commands::common::{format_note_lines, normalize_search_query, report_status, CliSync};
use crate::error::CliError;

pub async fn search_notes(
    sync: &CliSync,
    query: &str,
    limit: usize,
) -> Result<Vec<Note>, CliError> {
    let normalized_query = normalize_search_query(query)?;
    let result = sync.get_all().await;
    report_status(&result.status);

    Ok(filter_notes(&result.item, &normalized_query)
        .into_iter()
        .take(limit)
        .collect())
}

pub async fn run_search(
    sync: &CliSync,
    query: &str,
    limit: usize,
    as_json: bool,
) -> Result<(), CliError> {
    let notes = search_notes(sync, query, limit).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else {
        for line in format_note_lines(&notes) {
            println!("{line}");
        }
    }

    Ok(())
}
