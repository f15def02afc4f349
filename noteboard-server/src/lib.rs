//! # noteboard-server
//!
//! UNIX-domain socket server for noteboard.
//!
//! This crate provides:
//! - An accept loop with one task per connection
//! - UID scoping from socket peer credentials
//! - The per-connection request/acknowledgement state machine
//! - Daemon configuration

pub mod config;
pub mod error;
pub mod handler;
pub mod server;

pub use config::{Config, ConfigError};
pub use error::ServerError;
pub use handler::ConnectionHandler;
pub use server::{Server, ServerConfig, ServerStats};
