//! Error types for local noting-core operations.
//!
//! Remote failures live in [`crate::remote::RemoteError`]; this enum covers the
//! local database, the filesystem and configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Database written by a newer client than this one understands
    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i32, supported: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
