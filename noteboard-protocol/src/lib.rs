//! # noteboard-protocol
//!
//! Wire protocol for the noteboard note service.
//!
//! This crate provides:
//! - Binary framing for requests and responses with length-prefixed fields
//! - Subject validation and sanitization
//! - Bounded message types whose limits are enforced at construction
//!
//! ## Frame layout
//!
//! All multi-byte integers are big-endian. A request frame:
//!
//! ```text
//! +---------+-------------+--------------+-------------+----------------+
//! | command | subject_len | subject      | payload_len | payload        |
//! | 1 byte  | 4 bytes     | 1..=30 bytes | 4 bytes     | 0..=2000 bytes |
//! +---------+-------------+--------------+-------------+----------------+
//! ```
//!
//! A response frame:
//!
//! ```text
//! +--------+-------------+----------------+
//! | status | payload_len | payload        |
//! | 1 byte | 4 bytes     | 0..=2000 bytes |
//! +--------+-------------+----------------+
//! ```
//!
//! The payload is only meaningful for `ADD` requests (the note body) and
//! `DATA` responses (a retrieved note body). A successful `GET` produces two
//! response frames in order: `DATA` carrying the body, then an `OK`
//! acknowledgement. Every other exchange is one request, one acknowledgement.

pub mod codec;
pub mod error;
pub mod message;
pub mod subject;

pub use codec::{Decoder, Encoder};
pub use error::ProtocolError;
pub use message::{Command, Request, Response, Status};
pub use subject::Subject;

/// Maximum subject length in bytes.
pub const MAX_SUBJECT_LEN: usize = 30;

/// Maximum payload length in bytes (note bodies and data responses).
pub const MAX_PAYLOAD_LEN: usize = 2000;

/// Default path of the server's listening socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/lib/noteboard/noteboard.sock";
