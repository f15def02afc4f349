//! Daemon configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via NOTEBOARD_CONFIG)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory the daemon confines itself to.
    pub root_dir: PathBuf,
    /// Name of the notes subdirectory inside the root.
    pub notes_dir: String,
    /// Name of the socket file inside the root.
    pub socket_name: String,
    /// Whether to attempt a chroot into the root directory at startup.
    pub chroot: bool,
    /// Maximum concurrent connections.
    pub max_connections: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("/var/lib/noteboard"),
            notes_dir: "notes".to_string(),
            socket_name: "noteboard.sock".to_string(),
            chroot: true,
            max_connections: 256,
        }
    }
}

impl Config {
    /// Loads configuration from file, then applies environment variable
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Ok(path) = std::env::var("NOTEBOARD_CONFIG") {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("NOTEBOARD_ROOT") {
            self.root_dir = PathBuf::from(root);
        }

        if let Ok(dir) = std::env::var("NOTEBOARD_NOTES_DIR") {
            self.notes_dir = dir;
        }

        if let Ok(name) = std::env::var("NOTEBOARD_SOCKET_NAME") {
            self.socket_name = name;
        }

        if let Ok(chroot) = std::env::var("NOTEBOARD_CHROOT") {
            self.chroot = chroot == "1" || chroot.to_lowercase() == "true";
        }

        if let Ok(max) = std::env::var("NOTEBOARD_MAX_CONNECTIONS") {
            if let Ok(n) = max.parse() {
                self.max_connections = n;
            }
        }
    }

    /// Path of the notes directory under the effective root.
    ///
    /// `base` is `/` once the daemon has chrooted, or `root_dir` when it
    /// runs unprivileged.
    pub fn notes_path(&self, base: &Path) -> PathBuf {
        base.join(&self.notes_dir)
    }

    /// Path of the socket file under the effective root.
    pub fn socket_path(&self, base: &Path) -> PathBuf {
        base.join(&self.socket_name)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    IoError(PathBuf, std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.root_dir, PathBuf::from("/var/lib/noteboard"));
        assert_eq!(config.notes_dir, "notes");
        assert_eq!(config.socket_name, "noteboard.sock");
        assert!(config.chroot);
        assert_eq!(config.max_connections, 256);
    }

    #[test]
    fn test_paths_under_base() {
        let config = Config::default();
        assert_eq!(
            config.notes_path(Path::new("/")),
            PathBuf::from("/notes")
        );
        assert_eq!(
            config.socket_path(Path::new("/var/lib/noteboard")),
            PathBuf::from("/var/lib/noteboard/noteboard.sock")
        );
    }

    #[test]
    fn test_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "root_dir: /srv/notes\nsocket_name: nb.sock\nchroot: false\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/srv/notes"));
        assert_eq!(config.socket_name, "nb.sock");
        assert!(!config.chroot);
        // unspecified fields keep their defaults
        assert_eq!(config.notes_dir, "notes");
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/config.yaml");
        assert!(matches!(result, Err(ConfigError::IoError(_, _))));
    }

    #[test]
    fn test_from_file_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "root_dir: [not, a, path").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_, _))));
    }
}
