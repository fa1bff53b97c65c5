use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::commands::common::write_output;
use crate::error::CliError;

pub fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    let mut buffer = Vec::new();
    generate(shell, &mut command, bin_name, &mut buffer);
    write_output(&buffer, output_path)
}
