//! Per-connection request handling.

use crate::error::ServerError;
use noteboard_protocol::{Command, Decoder, Request, Response};
use noteboard_storage::{NoteKey, NoteStore};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Handles one connection: a single request, its storage action, and a final
/// acknowledgement.
pub struct ConnectionHandler {
    store: Arc<NoteStore>,
}

impl ConnectionHandler {
    /// Creates a handler over the given store.
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }

    /// Drives one connection to completion.
    ///
    /// `uid` is the peer's OS-level identity, resolved by the accept loop
    /// from socket credentials before any data is read. Threading it in as a
    /// parameter keeps the handler runnable over any byte stream.
    ///
    /// Whatever happened earlier, exactly one acknowledgement frame (`Ok` or
    /// `Fail`) is sent before returning, as long as the transport still
    /// accepts writes.
    pub async fn handle<S>(&self, stream: &mut S, uid: u32) -> Result<(), ServerError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let outcome = self.serve(stream, uid).await;

        let ack = match &outcome {
            Ok(()) => Response::ok(),
            Err(e) => {
                tracing::warn!("request from uid {} failed: {}", uid, e);
                Response::fail()
            }
        };
        stream.write_all(&ack.encode()).await?;
        stream.flush().await?;

        outcome
    }

    async fn serve<S>(&self, stream: &mut S, uid: u32) -> Result<(), ServerError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let request = read_request(stream).await?;
        tracing::debug!(
            "uid {}: {:?} {:?}",
            uid,
            request.command(),
            request.subject().as_str()
        );

        // the storage key is the validated subject scoped by the caller's
        // UID; it is never sent back to the peer
        let key = NoteKey::new(request.subject().as_str(), uid);

        match request.command() {
            Command::Add => self.store.add(&key, request.payload())?,
            Command::Get => {
                let body = self.store.get(&key)?;
                let data = Response::data(body)?;
                stream.write_all(&data.encode()).await?;
                stream.flush().await?;
            }
            Command::Remove => self.store.remove(&key)?,
        }
        Ok(())
    }
}

/// Reads exactly one request off the stream.
async fn read_request<S>(stream: &mut S) -> Result<Request, ServerError>
where
    S: AsyncRead + Unpin,
{
    let mut decoder = Decoder::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(request) = decoder.decode_request()? {
            return Ok(request);
        }
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(ServerError::ConnectionClosed);
        }
        decoder.extend(&buf[..n]);
    }
}
