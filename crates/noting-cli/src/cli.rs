use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "noting")]
#[command(about = "Offline-first notes with best-effort remote sync")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Never contact the remote store
    #[arg(long, global = true)]
    pub offline: bool,

    /// Quick capture: noting "my thought here"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note text
        text: Vec<String>,
        /// Note date (yyyy-MM-dd), today when omitted
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
        /// Pin the note
        #[arg(long)]
        pin: bool,
    },
    /// List notes, newest first
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only pinned notes
        #[arg(long)]
        pinned: bool,
        /// Group notes under month headers
        #[arg(long)]
        grouped: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one note
    Show {
        /// Note ID
        id: String,
    },
    /// Replace the text of a note
    Edit {
        /// Note ID
        id: String,
        /// New text; opens $EDITOR when omitted
        text: Vec<String>,
    },
    /// Pin or unpin a note
    Pin {
        /// Note ID
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
    /// Search notes by text or date
    Search {
        /// Search query
        query: String,
        /// Number of notes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reconcile local notes with the remote store
    Sync,
    /// Remove every local note and pending deletion
    Clear,
    /// Export notes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for noting_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}
