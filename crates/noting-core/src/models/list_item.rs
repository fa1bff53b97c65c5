//! Month-grouped list rows

use chrono::NaiveDate;
use serde::Serialize;

use super::Note;

const UNKNOWN_MONTH: &str = "unknown";

/// Row of a month-grouped note list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteListItem {
    /// `month` is the English month name, `key` is `yyyy-MM`
    MonthHeader { month: String, key: String },
    Note { note: Note },
}

fn parse_note_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Sort notes newest first and insert a header before each month.
///
/// Notes whose date does not parse sort last under an `"unknown"` header.
#[must_use]
pub fn group_notes_by_month(notes: &[Note]) -> Vec<NoteListItem> {
    let mut sorted = notes
        .iter()
        .map(|note| (parse_note_date(&note.date), note))
        .collect::<Vec<_>>();
    // `None` orders below every date, so a reversed comparison puts it last.
    sorted.sort_by(|(left, _), (right, _)| right.cmp(left));

    let mut items = Vec::with_capacity(sorted.len() + 4);
    let mut current_key: Option<String> = None;

    for (date, note) in sorted {
        let (key, month) = date.map_or_else(
            || (UNKNOWN_MONTH.to_string(), UNKNOWN_MONTH.to_string()),
            |date| (date.format("%Y-%m").to_string(), date.format("%B").to_string()),
        );

        if current_key.as_deref() != Some(key.as_str()) {
            items.push(NoteListItem::MonthHeader {
                month,
                key: key.clone(),
            });
            current_key = Some(key);
        }
        items.push(NoteListItem::Note { note: note.clone() });
    }

    items
}
