use crate::commands::common::{report_status, CliSync};
use crate::error::CliError;

pub async fn run_clear(sync: &CliSync) -> Result<(), CliError> {
    let result = sync.clear_local_data().await;
    report_status(&result.status);
    if !result.status.is_failure() {
        println!("Local notes cleared");
    }
    Ok(())
}
