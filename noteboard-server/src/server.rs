//! UNIX-domain socket server.

use crate::error::ServerError;
use crate::handler::ConnectionHandler;
use noteboard_storage::NoteStore;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::sync::broadcast;

/// Runtime server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path the listening socket is bound at.
    pub socket_path: PathBuf,
    /// Mode bits for the socket file; every local user must be able to
    /// connect.
    pub socket_mode: u32,
    /// Maximum concurrent connections.
    pub max_connections: usize,
}

impl ServerConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            socket_mode: 0o766,
            max_connections: 256,
        }
    }
}

/// Server statistics.
#[derive(Debug, Default)]
pub struct ServerStats {
    pub connections_total: AtomicU64,
    pub connections_active: AtomicU64,
    pub errors_total: AtomicU64,
}

/// UNIX-domain socket server for noteboard.
pub struct Server {
    config: ServerConfig,
    handler: Arc<ConnectionHandler>,
    stats: Arc<ServerStats>,
    shutdown: broadcast::Sender<()>,
    running: AtomicBool,
}

impl Server {
    /// Creates a new server over the given note store.
    pub fn new(config: ServerConfig, store: Arc<NoteStore>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            handler: Arc::new(ConnectionHandler::new(store)),
            stats: Arc::new(ServerStats::default()),
            shutdown: shutdown_tx,
            running: AtomicBool::new(false),
        }
    }

    /// Runs the accept loop until shutdown.
    ///
    /// Each accepted connection is served on its own task; a failure on one
    /// connection is logged and never stops the loop.
    pub async fn run(&self) -> Result<(), ServerError> {
        // a socket file left behind by a previous instance blocks bind
        if self.config.socket_path.exists() {
            fs::remove_file(&self.config.socket_path)?;
        }

        let listener = UnixListener::bind(&self.config.socket_path)?;
        fs::set_permissions(
            &self.config.socket_path,
            fs::Permissions::from_mode(self.config.socket_mode),
        )?;
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            "server listening on {}",
            self.config.socket_path.display()
        );

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((mut stream, _addr)) => {
                            if self.stats.connections_active.load(Ordering::Relaxed)
                                >= self.config.max_connections as u64
                            {
                                tracing::warn!("connection limit reached, dropping client");
                                continue;
                            }

                            self.stats.connections_total.fetch_add(1, Ordering::Relaxed);
                            self.stats.connections_active.fetch_add(1, Ordering::Relaxed);

                            let handler = self.handler.clone();
                            let stats = self.stats.clone();

                            tokio::spawn(async move {
                                // the peer's identity comes from the socket
                                // itself, before any data is read; without it
                                // no request can be scoped to a caller
                                let cred = match stream.peer_cred() {
                                    Ok(cred) => cred,
                                    Err(e) => {
                                        tracing::error!("peer credential lookup failed: {}", e);
                                        stats.errors_total.fetch_add(1, Ordering::Relaxed);
                                        stats.connections_active.fetch_sub(1, Ordering::Relaxed);
                                        return;
                                    }
                                };

                                if let Err(e) = handler.handle(&mut stream, cred.uid()).await {
                                    tracing::debug!("connection error: {}", e);
                                    stats.errors_total.fetch_add(1, Ordering::Relaxed);
                                }
                                stats.connections_active.fetch_sub(1, Ordering::Relaxed);
                            });
                        }
                        Err(e) => {
                            tracing::error!("accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("server shutting down");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        if let Err(e) = fs::remove_file(&self.config.socket_path) {
            tracing::warn!("failed to remove socket file: {}", e);
        }
        Ok(())
    }

    /// Initiates server shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(());
    }

    /// Returns whether the server is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns server statistics.
    pub fn stats(&self) -> &ServerStats {
        &self.stats
    }
}
