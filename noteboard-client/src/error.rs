//! Client error types.

use noteboard_protocol::Status;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] noteboard_protocol::ProtocolError),

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("server rejected the request")]
    Rejected,

    #[error("unexpected response status {0:?}")]
    UnexpectedStatus(Status),
}
