//! Request and response frames and their byte-level codecs.

use crate::error::ProtocolError;
use crate::subject::Subject;
use crate::{MAX_PAYLOAD_LEN, MAX_SUBJECT_LEN};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Request command tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Create a note. Fails if one with the same subject already exists.
    Add = 0,
    /// Retrieve a note's body.
    Get = 1,
    /// Delete a note.
    Remove = 2,
}

impl Command {
    /// Parses a wire tag.
    pub fn from_tag(tag: u8) -> Result<Self, ProtocolError> {
        match tag {
            0 => Ok(Command::Add),
            1 => Ok(Command::Get),
            2 => Ok(Command::Remove),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }

    /// The wire tag for this command.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// Response status tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Terminal acknowledgement of a successful request.
    Ok = 0,
    /// Carries a retrieved note body; followed by an `Ok` acknowledgement.
    Data = 1,
    /// Terminal acknowledgement of a failed request.
    Fail = 2,
}

impl Status {
    /// Parses a wire tag.
    pub fn from_tag(tag: u8) -> Result<Self, ProtocolError> {
        match tag {
            0 => Ok(Status::Ok),
            1 => Ok(Status::Data),
            2 => Ok(Status::Fail),
            other => Err(ProtocolError::UnknownStatus(other)),
        }
    }

    /// The wire tag for this status.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// A client request: one command against one subject.
///
/// Limits are enforced at construction, so a `Request` in hand always
/// encodes to a valid frame. The constructors leave the payload empty for
/// `Get` and `Remove`; a decoded frame keeps whatever payload the peer sent,
/// bounds-checked, and the server ignores it for non-`Add` commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: Command,
    subject: Subject,
    payload: Bytes,
}

impl Request {
    /// Builds an `Add` request carrying the note body.
    pub fn add(subject: Subject, body: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let payload = body.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len() as u32,
                max: MAX_PAYLOAD_LEN as u32,
            });
        }
        Ok(Self {
            command: Command::Add,
            subject,
            payload,
        })
    }

    /// Builds a `Get` request.
    pub fn get(subject: Subject) -> Self {
        Self {
            command: Command::Get,
            subject,
            payload: Bytes::new(),
        }
    }

    /// Builds a `Remove` request.
    pub fn remove(subject: Subject) -> Self {
        Self {
            command: Command::Remove,
            subject,
            payload: Bytes::new(),
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encodes the request into one contiguous buffer.
    ///
    /// The whole frame is assembled before anything touches the transport,
    /// so a send is all-or-nothing from the caller's point of view.
    pub fn encode(&self) -> BytesMut {
        let subject = self.subject.as_str().as_bytes();
        let mut buf = BytesMut::with_capacity(1 + 4 + subject.len() + 4 + self.payload.len());
        buf.put_u8(self.command.tag());
        buf.put_u32(subject.len() as u32);
        buf.put_slice(subject);
        buf.put_u32(self.payload.len() as u32);
        buf.put_slice(&self.payload);
        buf
    }

    /// Decodes one request from the buffer.
    ///
    /// Returns `Ok(Some(_))` for a complete frame and `Ok(None)` when more
    /// bytes are needed. Fields are validated as soon as their bytes are
    /// available, in wire order: an unknown command or an out-of-range
    /// length fails before any later field is looked at.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        if buf.is_empty() {
            return Ok(None);
        }
        let command = Command::from_tag(buf[0])?;

        if buf.len() < 5 {
            return Ok(None);
        }
        let subject_len = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]);
        if subject_len == 0 || subject_len as usize > MAX_SUBJECT_LEN {
            return Err(ProtocolError::SubjectLength(subject_len));
        }
        let subject_len = subject_len as usize;

        if buf.len() < 5 + subject_len {
            return Ok(None);
        }
        let subject = Subject::sanitize(&buf[5..5 + subject_len])?;

        let len_at = 5 + subject_len;
        if buf.len() < len_at + 4 {
            return Ok(None);
        }
        let payload_len = u32::from_be_bytes(buf[len_at..len_at + 4].try_into().unwrap());
        if payload_len as usize > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_LEN as u32,
            });
        }
        let payload_len = payload_len as usize;

        if buf.len() < len_at + 4 + payload_len {
            return Ok(None);
        }

        buf.advance(len_at + 4);
        let payload = buf.split_to(payload_len).freeze();

        Ok(Some(Self {
            command,
            subject,
            payload,
        }))
    }
}

/// A server response frame.
///
/// As with [`Request`], the payload cap is enforced at construction; only
/// `Data` responses carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    payload: Bytes,
}

impl Response {
    /// Builds an `Ok` acknowledgement.
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            payload: Bytes::new(),
        }
    }

    /// Builds a `Fail` acknowledgement.
    pub fn fail() -> Self {
        Self {
            status: Status::Fail,
            payload: Bytes::new(),
        }
    }

    /// Builds a `Data` response carrying a note body.
    pub fn data(body: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let payload = body.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len() as u32,
                max: MAX_PAYLOAD_LEN as u32,
            });
        }
        Ok(Self {
            status: Status::Data,
            payload,
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encodes the response into one contiguous buffer.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(1 + 4 + self.payload.len());
        buf.put_u8(self.status.tag());
        buf.put_u32(self.payload.len() as u32);
        buf.put_slice(&self.payload);
        buf
    }

    /// Decodes one response from the buffer.
    ///
    /// Payload bytes are always consumed, so a following frame starts
    /// aligned even when the caller has no use for the body.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        if buf.is_empty() {
            return Ok(None);
        }
        let status = Status::from_tag(buf[0])?;

        if buf.len() < 5 {
            return Ok(None);
        }
        let payload_len = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]);
        if payload_len as usize > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_LEN as u32,
            });
        }
        let payload_len = payload_len as usize;

        if buf.len() < 5 + payload_len {
            return Ok(None);
        }

        buf.advance(5);
        let payload = buf.split_to(payload_len).freeze();

        Ok(Some(Self { status, payload }))
    }
}
