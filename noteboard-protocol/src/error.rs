//! Protocol error types.

use thiserror::Error;

/// Errors raised while encoding or decoding frames.
///
/// Everything except [`ProtocolError::Io`] is a validation error: the bytes
/// arrived intact but their contents are not acceptable. `Io` covers the
/// transport itself failing, including the peer closing mid-frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown command tag: {0:#04x}")]
    UnknownCommand(u8),

    #[error("unknown status tag: {0:#04x}")]
    UnknownStatus(u8),

    #[error("subject length out of range: {0}")]
    SubjectLength(u32),

    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: u32, max: u32 },

    #[error("subject contains forbidden character {0:?}")]
    ForbiddenCharacter(char),

    #[error("subject has no meaningful characters")]
    EmptySubject,

    #[error("subject is not valid UTF-8")]
    InvalidUtf8,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Returns whether the error came from the transport rather than from
    /// frame contents.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProtocolError::Io(_))
    }
}
