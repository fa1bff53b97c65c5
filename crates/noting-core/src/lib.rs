//! noting-core - Core library for Noting
//!
//! This crate contains the note models, the `SQLite` local store, the remote
//! store clients, and the offline-first sync policy that keeps them
//! consistent. Front-ends only wire collaborators together and call into
//! [`sync::NoteSync`].

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod identity;
pub mod models;
pub mod network;
pub mod remote;
pub mod search;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{LocalNote, Note, NoteId, NoteStatus, RemoteNote, Tombstone, WithStatus};
pub use sync::NoteSync;
