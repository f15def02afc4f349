//! High-level client API.

use crate::error::ClientError;
use noteboard_protocol::{Decoder, Request, Response, Status, Subject, DEFAULT_SOCKET_PATH};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server socket path.
    pub socket_path: PathBuf,
}

impl ClientConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

/// Client for the noteboard server.
///
/// The protocol serves one request per connection, so every operation opens
/// its own connection and drops it after the final acknowledgement.
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Creates a new client.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Stores a new note. Fails if one with this subject already exists.
    pub async fn add(&self, subject: &str, body: &[u8]) -> Result<(), ClientError> {
        let request = Request::add(Subject::new(subject)?, body.to_vec())?;
        let mut stream = self.send(request).await?;
        self.read_ack(&mut stream, &mut Decoder::new()).await
    }

    /// Retrieves a note's body.
    pub async fn get(&self, subject: &str) -> Result<Vec<u8>, ClientError> {
        let request = Request::get(Subject::new(subject)?);
        let mut stream = self.send(request).await?;

        let mut decoder = Decoder::new();
        let first = read_response(&mut stream, &mut decoder).await?;
        let body = match first.status() {
            Status::Data => first.payload().to_vec(),
            Status::Fail => return Err(ClientError::Rejected),
            Status::Ok => return Err(ClientError::UnexpectedStatus(Status::Ok)),
        };

        // the body frame is followed by a separate acknowledgement
        self.read_ack(&mut stream, &mut decoder).await?;
        Ok(body)
    }

    /// Deletes a note.
    pub async fn remove(&self, subject: &str) -> Result<(), ClientError> {
        let request = Request::remove(Subject::new(subject)?);
        let mut stream = self.send(request).await?;
        self.read_ack(&mut stream, &mut Decoder::new()).await
    }

    /// Connects and writes one request frame.
    async fn send(&self, request: Request) -> Result<UnixStream, ClientError> {
        tracing::debug!("connecting to {}", self.config.socket_path.display());
        let mut stream = UnixStream::connect(&self.config.socket_path).await?;
        stream.write_all(&request.encode()).await?;
        stream.flush().await?;
        Ok(stream)
    }

    /// Reads the terminal acknowledgement.
    async fn read_ack(
        &self,
        stream: &mut UnixStream,
        decoder: &mut Decoder,
    ) -> Result<(), ClientError> {
        let ack = read_response(stream, decoder).await?;
        match ack.status() {
            Status::Ok => Ok(()),
            Status::Fail => Err(ClientError::Rejected),
            Status::Data => Err(ClientError::UnexpectedStatus(Status::Data)),
        }
    }
}

/// Reads one response frame off the stream.
async fn read_response(
    stream: &mut UnixStream,
    decoder: &mut Decoder,
) -> Result<Response, ClientError> {
    let mut buf = [0u8; 4096];
    loop {
        if let Some(response) = decoder.decode_response()? {
            return Ok(response);
        }
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(ClientError::ConnectionClosed);
        }
        decoder.extend(&buf[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteboard_protocol::Command;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::net::UnixListener;

    /// Accepts one connection and answers with the given response frames.
    /// Returns the request that was received.
    fn serve_once(
        socket: &Path,
        responses: Vec<Response>,
    ) -> tokio::task::JoinHandle<Request> {
        let listener = UnixListener::bind(socket).unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut decoder = Decoder::new();
            let mut buf = [0u8; 4096];
            let request = loop {
                if let Some(request) = decoder.decode_request().unwrap() {
                    break request;
                }
                let n = stream.read(&mut buf).await.unwrap();
                assert_ne!(n, 0, "client closed before sending a full request");
                decoder.extend(&buf[..n]);
            };

            for response in responses {
                stream.write_all(&response.encode()).await.unwrap();
            }
            stream.flush().await.unwrap();
            request
        })
    }

    fn client_for(socket: &Path) -> Client {
        Client::new(ClientConfig::new(socket))
    }

    #[tokio::test]
    async fn test_add_sends_body_and_reads_ack() {
        let dir = TempDir::new().unwrap();
        let socket = dir.path().join("nb.sock");
        let server = serve_once(&socket, vec![Response::ok()]);

        client_for(&socket).add("todo", b"buy milk").await.unwrap();

        let request = server.await.unwrap();
        assert_eq!(request.command(), Command::Add);
        assert_eq!(request.subject().as_str(), "todo");
        assert_eq!(request.payload(), b"buy milk");
    }

    #[tokio::test]
    async fn test_get_reads_data_then_ack() {
        let dir = TempDir::new().unwrap();
        let socket = dir.path().join("nb.sock");
        let server = serve_once(
            &socket,
            vec![Response::data(&b"buy milk"[..]).unwrap(), Response::ok()],
        );

        let body = client_for(&socket).get("todo").await.unwrap();
        assert_eq!(body, b"buy milk");

        let request = server.await.unwrap();
        assert_eq!(request.command(), Command::Get);
        assert_eq!(request.payload(), b"");
    }

    #[tokio::test]
    async fn test_rejection_surfaces_as_error() {
        let dir = TempDir::new().unwrap();
        let socket = dir.path().join("nb.sock");
        let server = serve_once(&socket, vec![Response::fail()]);

        let result = client_for(&socket).get("missing").await;
        assert!(matches!(result, Err(ClientError::Rejected)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unexpected_status_on_get() {
        let dir = TempDir::new().unwrap();
        let socket = dir.path().join("nb.sock");
        let server = serve_once(&socket, vec![Response::ok()]);

        let result = client_for(&socket).get("todo").await;
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatus(Status::Ok))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_close_without_ack() {
        let dir = TempDir::new().unwrap();
        let socket = dir.path().join("nb.sock");
        let server = serve_once(&socket, vec![]);

        let result = client_for(&socket).remove("todo").await;
        assert!(matches!(result, Err(ClientError::ConnectionClosed)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_subject_fails_before_connecting() {
        // no server bound at all; validation must fire first
        let client = Client::new(ClientConfig::new("/nonexistent/nb.sock"));
        let result = client.add("a/b", b"body").await;
        assert!(matches!(result, Err(ClientError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_oversized_body_fails_before_connecting() {
        let client = Client::new(ClientConfig::new("/nonexistent/nb.sock"));
        let body = vec![0u8; 2001];
        let result = client.add("todo", &body).await;
        assert!(matches!(result, Err(ClientError::Protocol(_))));
    }
}
