//! Error types for traveldb
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Absence is not an error here: lookups return `Option` and updates
//! report whether a record existed. The only store-level failure is an
//! insert conflict; the remaining variants belong to the bulk loader.

use crate::types::RecordKind;
use std::io;
use thiserror::Error;

/// Result type alias for traveldb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the traveldb store and loader
#[derive(Debug, Error)]
pub enum Error {
    /// Insert attempted with an id already present in the collection
    #[error("conflict: {kind} id {id} already exists")]
    Conflict {
        /// Collection the conflicting id belongs to
        kind: RecordKind,
        /// The conflicting identifier
        id: i32,
    },

    /// I/O error while reading bulk-load data
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a bulk-load document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a conflict error for the given collection and id
    pub fn conflict(kind: RecordKind, id: i32) -> Self {
        Error::Conflict { kind, id }
    }
}
