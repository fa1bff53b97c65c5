//! Noting CLI - offline-first notes from the command line
//!
//! Every command works against the local database; when a remote store and an
//! identity are configured and reachable, changes are reconciled with it.

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::clear::run_clear;
use crate::commands::common::{load_config, open_sync, resolve_config_path, resolve_db_path};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::pin::run_pin;
use crate::commands::search::run_search;
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env();
    let filter = match "noting=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell, output }) = &cli.command {
        return run_completions(*shell, output.as_deref());
    }
    if cli.command.is_none() && cli.note.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let config_path = resolve_config_path(cli.config)?;
    let config = load_config(&config_path, cli.offline)?;
    tracing::debug!("Loaded configuration {config:?}");
    let db_path = resolve_db_path(cli.db_path, &config)?;
    let sync = open_sync(&config, &db_path).await?;

    match cli.command {
        Some(Commands::Add { text, date, pin }) => {
            run_add(&sync, &text, date.as_deref(), pin).await?;
        }
        Some(Commands::List {
            limit,
            pinned,
            grouped,
            json,
        }) => run_list(&sync, limit, pinned, grouped, json).await?,
        Some(Commands::Show { id }) => run_show(&sync, &id).await?,
        Some(Commands::Edit { id, text }) => {
            run_edit(&sync, &id, &text).await?;
        }
        Some(Commands::Pin { id }) => {
            run_pin(&sync, &id).await?;
        }
        Some(Commands::Delete { id }) => {
            run_delete(&sync, &id).await?;
        }
        Some(Commands::Search { query, limit, json }) => {
            run_search(&sync, &query, limit, json).await?;
        }
        Some(Commands::Sync) => {
            run_sync(&sync).await?;
        }
        Some(Commands::Clear) => run_clear(&sync).await?,
        Some(Commands::Export { format, output }) => {
            run_export(&sync, format, output.as_deref()).await?;
        }
        Some(Commands::Completions { .. }) => {}
        None => {
            // Quick capture mode: noting "my thought"
            run_add(&sync, &cli.note, None, false).await?;
        }
    }

    Ok(())
}
