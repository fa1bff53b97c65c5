use noting_core::sync::SyncReport;
use noting_core::NoteStatus;

use crate::commands::common::CliSync;
use crate::error::CliError;

pub async fn run_sync(sync: &CliSync) -> Result<SyncReport, CliError> {
    let result = sync.full_sync().await;
    let ran = !result.item.passes.is_empty() || !result.item.failed_passes.is_empty();
    if ran {
        for line in format_sync_report(&result.item) {
            println!("{line}");
        }
    }

    if let NoteStatus::Failure(message) = result.status {
        return Err(CliError::Sync(message.unwrap_or_default()));
    }
    Ok(result.item)
}

pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    let mut lines = report
        .passes
        .iter()
        .map(|pass| {
            format!(
                "{:<24}  {}/{} ok",
                pass.pass.to_string(),
                pass.succeeded,
                pass.attempted
            )
        })
        .collect::<Vec<_>>();

    for failed in &report.failed_passes {
        lines.push(format!("{:<24}  failed: {}", failed.pass.to_string(), failed.message));
    }
    for failure in report.passes.iter().flat_map(|pass| &pass.failures) {
        lines.push(format!("  pending {}: {}", failure.id, failure.message));
    }

    let summary = if report.failed_passes.is_empty() {
        "Sync completed"
    } else {
        "Sync finished with errors"
    };
    lines.push(match report.pending_failures() {
        0 => summary.to_string(),
        pending => format!("{summary}, {pending} item(s) still pending"),
    });
    lines
}
