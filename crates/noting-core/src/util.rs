//! Small text and time helpers shared by config, remote and model code.

const MAX_COMPACT_CHARS: usize = 180;

/// Trimmed value, or `None` for missing and blank input
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Whether `value` carries an `http://` or `https://` scheme (case-insensitive)
pub fn is_http_url(value: &str) -> bool {
    let lowered = value.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

/// Single-line, length-capped rendering of a response body for error messages
pub fn compact_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_COMPACT_CHARS)
        .collect()
}

/// Current Unix timestamp in milliseconds.
pub fn unix_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's local date in the `yyyy-MM-dd` form notes are stamped with.
pub fn today_date_string() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
