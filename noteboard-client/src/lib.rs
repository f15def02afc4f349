//! # noteboard-client
//!
//! Client library for noteboard.
//!
//! This crate provides:
//! - A typed API for the three note operations
//! - One-shot connection handling (one request per connection)
//! - Typed errors distinguishing transport faults from server rejections

pub mod client;
pub mod error;

pub use client::{Client, ClientConfig};
pub use error::ClientError;
