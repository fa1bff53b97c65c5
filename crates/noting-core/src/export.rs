//! Note export rendering (JSON and Markdown).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::Note;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable note representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNote {
    pub id: i32,
    pub text: String,
    pub date: String,
    pub is_pinned: bool,
}

impl From<&Note> for ExportNote {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.get(),
            text: note.text.clone(),
            date: note.date.clone(),
            is_pinned: note.is_pinned,
        }
    }
}

/// Render notes as a pretty-printed JSON array.
pub fn render_json_export(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&notes.iter().map(ExportNote::from).collect::<Vec<_>>())
}

/// Render notes as Markdown, one frontmatter block per note, blank-line separated.
#[must_use]
pub fn render_markdown_export(notes: &[Note]) -> String {
    notes
        .iter()
        .map(ExportNote::from)
        .fold(String::new(), |mut output, note| {
            if !output.is_empty() {
                output.push('\n');
            }
            let _ = write!(
                output,
                "---\nid: {}\ndate: {}\npinned: {}\n---\n\n{}\n",
                note.id, note.date, note.is_pinned, note.text
            );
            output
        })
}

/// Render notes based on selected export format.
pub fn render_notes_export(notes: &[Note], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(notes),
        ExportFormat::Markdown => Ok(render_markdown_export(notes)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("noting-export-{timestamp_ms}.{}", format.extension())
}
