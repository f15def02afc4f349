//! Server error types.

use thiserror::Error;

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] noteboard_protocol::ProtocolError),

    #[error("storage error: {0}")]
    Storage(#[from] noteboard_storage::StorageError),

    #[error("connection closed before a complete frame arrived")]
    ConnectionClosed,
}
