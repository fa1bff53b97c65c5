use noting_core::NoteStatus;

use crate::commands::common::{parse_note_id, report_status, CliSync};
use crate::error::CliError;

pub async fn run_delete(sync: &CliSync, id: &str) -> Result<NoteStatus, CliError> {
    let id = parse_note_id(id)?;

    let result = sync.delete(id).await;
    if let NoteStatus::Failure(message) = &result.status {
        return Err(CliError::DeleteFailed(message.clone().unwrap_or_default()));
    }
    report_status(&result.status);

    println!("{id}");
    Ok(result.status)
}
