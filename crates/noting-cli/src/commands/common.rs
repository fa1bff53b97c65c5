use std::env;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use noting_core::config::NotingConfig;
use noting_core::db::{Database, SqliteNoteStore, SqliteTombstoneStore};
use noting_core::identity::SessionIdentity;
use noting_core::models::{NoteListItem, NoteStatus};
use noting_core::network::{Connectivity, ConnectivityFlag, TcpProbe};
use noting_core::remote::{RemoteBackend, SupabaseNoteClient};
use noting_core::{Note, NoteId, NoteSync};

use crate::error::CliError;

/// Reconciler wired with the collaborators the CLI uses
pub type CliSync = NoteSync<
    SqliteNoteStore,
    SqliteTombstoneStore,
    RemoteBackend,
    ConnectivityFlag,
    SessionIdentity,
>;

pub fn build_sync(
    db: &Database,
    remote: RemoteBackend,
    connectivity: ConnectivityFlag,
    identity: SessionIdentity,
) -> CliSync {
    NoteSync::new(
        db.notes(),
        db.tombstones(),
        remote,
        connectivity,
        identity,
    )
}

/// Open the local database and pick the remote side from `config`.
///
/// Without a configured remote (or with `offline`) every sync pass is
/// skipped locally and never reaches the network.
pub async fn open_sync(config: &NotingConfig, db_path: &Path) -> Result<CliSync, CliError> {
    let db = Database::open(db_path).await?;
    let identity = SessionIdentity::new(config.user_id.clone());

    let remote_settings = config.remote_settings().filter(|_| config.sync_enabled());
    let Some(settings) = remote_settings else {
        tracing::debug!("Remote sync disabled; working locally");
        return Ok(build_sync(
            &db,
            RemoteBackend::Disabled,
            ConnectivityFlag::new(false),
            identity,
        ));
    };

    let client = SupabaseNoteClient::new(
        &settings.url,
        settings.anon_key.clone(),
        config.access_token.clone(),
    )?;
    // One reachability check per invocation; a CLI run is short-lived
    let connectivity = TcpProbe::for_url(&settings.url)?.into_flag().await;
    if !connectivity.is_online() {
        tracing::info!("Remote host unreachable; working offline");
    }
    Ok(build_sync(
        &db,
        RemoteBackend::Supabase(client),
        connectivity,
        identity,
    ))
}

pub fn load_config(path: &Path, offline: bool) -> Result<NotingConfig, CliError> {
    let mut config = NotingConfig::load(path)?;
    config.offline |= offline;
    Ok(config)
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_config_path {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("noting").join("config.json"))
        .ok_or_else(|| CliError::Config("failed to resolve config directory".to_string()))
}

/// `--db-path` wins over the configured path, then the platform data dir
pub fn resolve_db_path(
    cli_db_path: Option<PathBuf>,
    config: &NotingConfig,
) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_db_path.or_else(|| config.db_path.clone()) {
        return Ok(path);
    }
    dirs::data_dir()
        .map(|dir| dir.join("noting").join("noting.db"))
        .ok_or_else(|| CliError::Config("failed to resolve data directory".to_string()))
}

/// Print non-success statuses of background reconciliation to stderr
pub fn report_status(status: &NoteStatus) {
    match status {
        NoteStatus::Success => {}
        NoteStatus::Deleted => eprintln!("Remote deletion pending; it will be retried on sync"),
        NoteStatus::Failure(_) => eprintln!("Warning: {status}"),
    }
}

/// Turn a failed local save into an error, report anything else
pub fn ensure_saved(status: &NoteStatus) -> Result<(), CliError> {
    if let NoteStatus::Failure(message) = status {
        return Err(CliError::SaveFailed(message.clone().unwrap_or_default()));
    }
    report_status(status);
    Ok(())
}

pub fn parse_note_id(id: &str) -> Result<NoteId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyNoteId);
    }
    let parsed = trimmed
        .parse::<NoteId>()
        .map_err(|_| CliError::InvalidNoteId(trimmed.to_string()))?;
    if parsed.is_unsaved() {
        return Err(CliError::InvalidNoteId(trimmed.to_string()));
    }
    Ok(parsed)
}

pub async fn require_note(sync: &CliSync, id: NoteId) -> Result<Note, CliError> {
    let result = sync.get_by_id(id).await;
    if result.status.is_failure() {
        return Err(CliError::NoteNotFound(id.to_string()));
    }
    Ok(result.item)
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    notes.iter().map(format_note_line).collect()
}

fn format_note_line(note: &Note) -> String {
    let marker = if note.is_pinned { "*" } else { " " };
    let preview = note_preview(note, 48);
    format!("{marker} {:<11}  {:<10}  {preview}", note.id.to_string(), note.date)
}

/// Month headers followed by their notes
pub fn format_grouped_lines(items: &[NoteListItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            NoteListItem::MonthHeader { month, key } => {
                if key == month {
                    format!("== {month} ==")
                } else {
                    format!("== {month} ({key}) ==")
                }
            }
            NoteListItem::Note { note } => format_note_line(note),
        })
        .collect()
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Write to `output_path` and print it, or to stdout when omitted
pub fn write_output(bytes: &[u8], output_path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = output_path {
        std::fs::write(path, bytes)?;
        println!("{}", path.display());
    } else {
        io::stdout().write_all(bytes)?;
    }
    Ok(())
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input_with_initial("")? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    normalize_content(query).ok_or(CliError::EmptySearchQuery)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(CliError::EditorFailed("empty EDITOR command".into()));
    };

    let status = Command::new(program).args(parts).arg(file_path).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::EditorFailed(format!(
            "`{editor}` exited with status {status}"
        )))
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("noting-note-{}-{now}.md", std::process::id()))
}
