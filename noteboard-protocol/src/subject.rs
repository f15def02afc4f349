//! Subject validation.
//!
//! A subject is the client-chosen note title. The server uses it as the core
//! of a filename, so validation is a security boundary: path separators and
//! shell-adjacent characters are rejected outright.

use crate::error::ProtocolError;
use crate::MAX_SUBJECT_LEN;
use std::fmt;

/// A validated note subject.
///
/// Invariants: 1..=30 bytes of UTF-8, none of `;`, `/`, `.`, `\`, no leading
/// whitespace, at least one non-whitespace character. Only the constructors
/// on this type can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    /// Validates a caller-supplied subject string.
    pub fn new(raw: &str) -> Result<Self, ProtocolError> {
        if raw.is_empty() || raw.len() > MAX_SUBJECT_LEN {
            return Err(ProtocolError::SubjectLength(raw.len() as u32));
        }
        Self::sanitize(raw.as_bytes())
    }

    /// Sanitizes raw subject bytes as read off the wire.
    ///
    /// Checks run in wire order: forbidden characters first, over the whole
    /// buffer (anything after an embedded NUL still counts), then the leading
    /// whitespace strip, then truncation at the first NUL byte. The
    /// truncation tolerates senders that zero-pad a fixed-size buffer.
    pub fn sanitize(raw: &[u8]) -> Result<Self, ProtocolError> {
        debug_assert!(!raw.is_empty() && raw.len() <= MAX_SUBJECT_LEN);

        if let Some(&b) = raw.iter().find(|&&b| matches!(b, b';' | b'/' | b'.' | b'\\')) {
            return Err(ProtocolError::ForbiddenCharacter(b as char));
        }

        let stripped = match raw
            .iter()
            .position(|&b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        {
            Some(start) => &raw[start..],
            None => return Err(ProtocolError::EmptySubject),
        };

        let effective = match stripped.iter().position(|&b| b == 0) {
            Some(end) => &stripped[..end],
            None => stripped,
        };

        if effective.is_empty() {
            return Err(ProtocolError::EmptySubject);
        }

        let subject = std::str::from_utf8(effective).map_err(|_| ProtocolError::InvalidUtf8)?;
        Ok(Self(subject.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
