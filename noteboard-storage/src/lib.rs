//! # noteboard-storage
//!
//! Flat-file note storage for noteboard.
//!
//! This crate provides:
//! - A directory-rooted note store with one file per note
//! - Per-caller scoping through UID-suffixed file names
//! - Create-exclusive add semantics (no overwrite)

pub mod error;
pub mod store;

pub use error::StorageError;
pub use store::{NoteKey, NoteStore};
