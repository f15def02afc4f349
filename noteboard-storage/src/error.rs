//! Storage error types.

use crate::store::NoteKey;
use thiserror::Error;

/// Errors from the note store.
///
/// `NoteExists` and `NoteNotFound` are expected outcomes of precondition
/// checks, not faults; `Io` is a local filesystem failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("note already exists: {0}")]
    NoteExists(NoteKey),

    #[error("note not found: {0}")]
    NoteNotFound(NoteKey),
}
