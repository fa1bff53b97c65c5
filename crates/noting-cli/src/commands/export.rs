use std::path::Path;

use noting_core::export::{render_notes_export, suggested_export_file_name};
use noting_core::util::unix_timestamp_millis;

use crate::cli::ExportFormat;
use crate::commands::common::{report_status, write_output, CliSync};
use crate::error::CliError;

pub async fn run_export(
    sync: &CliSync,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let result = sync.get_all().await;
    report_status(&result.status);
    let rendered = render_notes_export(&result.item, format.into())?;

    // A directory gets a generated file name inside it
    let output_path = output_path.map(|path| {
        if path.is_dir() {
            path.join(suggested_export_file_name(
                format.into(),
                unix_timestamp_millis(),
            ))
        } else {
            path.to_path_buf()
        }
    });
    write_output(format!("{rendered}\n").as_bytes(), output_path.as_deref())
}
