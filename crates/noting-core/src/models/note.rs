//! Note model and its persisted/remote forms

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use uuid::Uuid;

/// Client-assigned integer note identity.
///
/// `0` is reserved for notes that have not been persisted yet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(i32);

impl NoteId {
    /// Identity of a note that has never been written to the local store
    pub const UNSAVED: Self = Self(0);

    /// Wrap a raw id
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Generate a random positive id from a v4 UUID.
    ///
    /// Uniqueness is probabilistic only; collisions in the 31-bit space are
    /// accepted.
    #[must_use]
    pub fn random() -> Self {
        loop {
            let folded = Uuid::new_v4()
                .into_bytes()
                .chunks_exact(4)
                .fold(0u32, |acc, chunk| {
                    acc ^ u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
                });
            let value = i32::try_from(folded & 0x7fff_ffff).unwrap_or_default();
            if value != 0 {
                return Self(value);
            }
        }
    }

    /// Raw integer value
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether this id still marks an unsaved note
    #[must_use]
    pub const fn is_unsaved(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i32> for NoteId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// A note as seen by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identity, `NoteId::UNSAVED` until first persisted
    pub id: NoteId,
    /// Plain text content
    pub text: String,
    /// Creation or last-edit date, `yyyy-MM-dd` by convention
    pub date: String,
    /// Pinned to the top of the list
    #[serde(default)]
    pub is_pinned: bool,
}

impl Note {
    /// Create an unsaved note with an explicit date
    #[must_use]
    pub fn new(text: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: NoteId::UNSAVED,
            text: text.into(),
            date: date.into(),
            is_pinned: false,
        }
    }

    /// Create an unsaved note stamped with today's date
    #[must_use]
    pub fn today(text: impl Into<String>) -> Self {
        Self::new(text, crate::util::today_date_string())
    }

    /// Empty note returned alongside a failed lookup
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Return this note with a fresh random id if it has none yet
    #[must_use]
    pub fn with_assigned_id(mut self) -> Self {
        if self.id.is_unsaved() {
            self.id = NoteId::random();
        }
        self
    }

    /// Copy of this note with the pin flag flipped
    #[must_use]
    pub fn toggled_pin(&self) -> Self {
        Self {
            is_pinned: !self.is_pinned,
            ..self.clone()
        }
    }

    /// Case-insensitive match against text or date. Blank queries match everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.text.to_lowercase().contains(&query) || self.date.to_lowercase().contains(&query)
    }

    /// Persisted form owned by `user_id`, not yet mirrored remotely
    #[must_use]
    pub fn to_local(&self, user_id: Option<String>) -> LocalNote {
        LocalNote {
            id: self.id,
            text: self.text.clone(),
            date: self.date.clone(),
            user_id,
            is_pinned: self.is_pinned,
            is_synced: false,
            is_deleted: false,
        }
    }

    /// Remote row for the given owner
    #[must_use]
    pub fn to_remote(&self, user_id: &str) -> RemoteNote {
        RemoteNote {
            app_id: self.id,
            user_id: user_id.to_string(),
            text: self.text.clone(),
            date: self.date.clone(),
            is_pinned: self.is_pinned,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Row of the local `notes` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNote {
    pub id: NoteId,
    pub text: String,
    pub date: String,
    /// Owning identity, `None` while signed out
    pub user_id: Option<String>,
    pub is_pinned: bool,
    /// Last local state has been mirrored to the remote store
    pub is_synced: bool,
    /// Soft delete flag, pending remote confirmation
    pub is_deleted: bool,
}

impl LocalNote {
    /// Domain view of this record
    #[must_use]
    pub fn to_note(&self) -> Note {
        Note {
            id: self.id,
            text: self.text.clone(),
            date: self.date.clone(),
            is_pinned: self.is_pinned,
        }
    }

    /// Remote row for this record, owned by its stored identity
    #[must_use]
    pub fn to_remote(&self) -> RemoteNote {
        RemoteNote {
            app_id: self.id,
            user_id: self.user_id.clone().unwrap_or_default(),
            text: self.text.clone(),
            date: self.date.clone(),
            is_pinned: self.is_pinned,
            created_at: None,
            updated_at: None,
        }
    }

    /// Copy marked as mirrored remotely
    #[must_use]
    pub fn synced(&self) -> Self {
        Self {
            is_synced: true,
            ..self.clone()
        }
    }

    /// Copy owned by `user_id` when it has no owner yet
    #[must_use]
    pub fn claimed_by(&self, user_id: &str) -> Self {
        Self {
            user_id: self
                .user_id
                .clone()
                .or_else(|| Some(user_id.to_string())),
            ..self.clone()
        }
    }
}

/// Marker that a note's deletion still has to reach the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    pub id: NoteId,
    /// When the local soft delete happened (Unix ms)
    pub deleted_at: i64,
}

/// Row of the remote `notes` table, scoped by `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNote {
    pub app_id: NoteId,
    pub user_id: String,
    pub text: String,
    pub date: String,
    #[serde(default)]
    pub is_pinned: bool,
    /// Server bookkeeping, ignored by the sync policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl RemoteNote {
    /// Local record for a pulled row; remote rows are synced by definition
    #[must_use]
    pub fn to_local(&self) -> LocalNote {
        LocalNote {
            id: self.app_id,
            text: self.text.clone(),
            date: self.date.clone(),
            user_id: Some(self.user_id.clone()),
            is_pinned: self.is_pinned,
            is_synced: true,
            is_deleted: false,
        }
    }
}
