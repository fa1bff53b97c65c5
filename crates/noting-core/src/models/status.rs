//! Operation status reported to the presentation layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a sync-aware note operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    Success,
    /// Deleted locally, remote deletion still pending
    Deleted,
    Failure(Option<String>),
}

impl NoteStatus {
    /// Failure carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(Some(message.into()))
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Deleted => write!(f, "deleted (remote deletion pending)"),
            Self::Failure(Some(message)) => write!(f, "failure: {message}"),
            Self::Failure(None) => write!(f, "failure"),
        }
    }
}

/// Payload paired with the status of the operation that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithStatus<T> {
    pub item: T,
    pub status: NoteStatus,
}

impl<T> WithStatus<T> {
    pub const fn new(item: T, status: NoteStatus) -> Self {
        Self { item, status }
    }

    pub const fn success(item: T) -> Self {
        Self::new(item, NoteStatus::Success)
    }

    pub fn failure(item: T, message: impl Into<String>) -> Self {
        Self::new(item, NoteStatus::failure(message))
    }
}
