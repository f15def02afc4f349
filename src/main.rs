//! noteboard - per-user note daemon over a UNIX-domain socket.
//!
//! Bootstraps the sandbox (chroot where privilege allows, an owner-only
//! notes directory, a world-connectable socket file) and runs the accept
//! loop until a shutdown signal arrives.

use noteboard_server::{Config, Server, ServerConfig};
use noteboard_storage::NoteStore;
use std::fs;
use std::io;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration (from file if NOTEBOARD_CONFIG is set, then env
    // overrides)
    let config = match Config::load() {
        Ok(c) => {
            if let Ok(path) = std::env::var("NOTEBOARD_CONFIG") {
                tracing::info!("Loaded config from {}", path);
            }
            c
        }
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return ExitCode::from(1);
        }
    };

    tracing::info!("Starting noteboard server");
    tracing::info!("  Root directory: {}", config.root_dir.display());
    tracing::info!("  Notes directory: {}", config.notes_dir);
    tracing::info!("  Socket: {}", config.socket_name);

    // Confine the process, then lay out the notes directory inside it
    let base = match enter_sandbox(&config) {
        Ok(base) => base,
        Err(e) => {
            tracing::error!("Initialization failed: {}", e);
            return ExitCode::from(1);
        }
    };

    let notes_path = config.notes_path(&base);
    if let Err(e) = prepare_notes_dir(&notes_path) {
        tracing::error!("Initialization failed: {}", e);
        return ExitCode::from(1);
    }

    let store = match NoteStore::open(&notes_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Initialization failed: {}", e);
            return ExitCode::from(1);
        }
    };

    let mut server_config = ServerConfig::new(config.socket_path(&base));
    server_config.max_connections = config.max_connections;
    let server = Arc::new(Server::new(server_config, store));

    // Spawn shutdown signal handler
    let shutdown_server = server.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received shutdown signal, stopping server...");
        shutdown_server.shutdown();
    });

    // Run server (blocks until shutdown)
    if let Err(e) = server.run().await {
        tracing::error!("Server failed: {}", e);
        return ExitCode::from(2);
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

/// Confines the process to the configured root directory.
///
/// chroot is a privileged operation; an unprivileged run keeps working
/// against the root directory by plain path prefixing.
fn enter_sandbox(config: &Config) -> io::Result<PathBuf> {
    fs::create_dir_all(&config.root_dir)?;

    if !config.chroot {
        return Ok(config.root_dir.clone());
    }

    match std::os::unix::fs::chroot(&config.root_dir) {
        Ok(()) => {
            std::env::set_current_dir("/")?;
            tracing::info!("  Sandbox: chrooted into {}", config.root_dir.display());
            Ok(PathBuf::from("/"))
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!(
                "  Sandbox: chroot unavailable without privilege, staying in {}",
                config.root_dir.display()
            );
            Ok(config.root_dir.clone())
        }
        Err(e) => Err(e),
    }
}

/// Creates the notes directory with owner-only permissions, or verifies that
/// an existing one already has them.
fn prepare_notes_dir(path: &Path) -> io::Result<()> {
    match fs::DirBuilder::new().mode(0o700).create(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let mode = fs::metadata(path)?.permissions().mode() & 0o777;
            if mode != 0o700 {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!(
                        "notes directory {} has mode {:o}, expected 700",
                        path.display(),
                        mode
                    ),
                ));
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
