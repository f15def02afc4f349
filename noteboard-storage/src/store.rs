//! The note store.
//!
//! Each note is a single file in the store directory, named
//! `<subject>.<uid>`. The UID suffix scopes notes per caller without a
//! directory-per-user scheme, and since `.` can never occur in a validated
//! subject, the split between subject and UID is unambiguous.

use crate::error::StorageError;
use noteboard_protocol::MAX_PAYLOAD_LEN;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

/// Storage key for one note: a validated subject plus the owner's UID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteKey {
    subject: String,
    uid: u32,
}

impl NoteKey {
    /// Builds a key from an already-validated subject.
    pub fn new(subject: impl Into<String>, uid: u32) -> Self {
        Self {
            subject: subject.into(),
            uid,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn uid(&self) -> u32 {
        self.uid
    }

    /// The file name backing this key.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.subject, self.uid)
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (uid {})", self.subject, self.uid)
    }
}

/// Note store rooted at one directory.
#[derive(Debug, Clone)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    /// Opens a store, creating the directory with owner-only permissions if
    /// it does not exist yet.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::DirBuilder::new()
                .recursive(true)
                .mode(0o700)
                .create(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn note_path(&self, key: &NoteKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Creates a note with the given body.
    ///
    /// Creation is exclusive: an existing note is never overwritten, and two
    /// concurrent adds for the same key cannot both succeed.
    pub fn add(&self, key: &NoteKey, body: &[u8]) -> Result<(), StorageError> {
        let path = self.note_path(key);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::NoteExists(key.clone()),
                _ => StorageError::Io(e),
            })?;
        file.write_all(body)?;
        tracing::info!("created note {}", key);
        Ok(())
    }

    /// Reads a note's whole body, capped at the wire payload maximum.
    /// Anything beyond the cap stays on disk and is simply not returned.
    pub fn get(&self, key: &NoteKey) -> Result<Vec<u8>, StorageError> {
        let path = self.note_path(key);
        let file = fs::File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NoteNotFound(key.clone()),
            _ => StorageError::Io(e),
        })?;

        let mut body = Vec::new();
        file.take(MAX_PAYLOAD_LEN as u64).read_to_end(&mut body)?;
        tracing::info!("retrieved note {}", key);
        Ok(body)
    }

    /// Deletes a note.
    pub fn remove(&self, key: &NoteKey) -> Result<(), StorageError> {
        let path = self.note_path(key);
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NoteNotFound(key.clone()),
            _ => StorageError::Io(e),
        })?;
        tracing::info!("removed note {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, NoteStore) {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::open(dir.path().join("notes")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_key_file_name() {
        let key = NoteKey::new("todo", 1000);
        assert_eq!(key.file_name(), "todo.1000");
        assert_eq!(key.subject(), "todo");
        assert_eq!(key.uid(), 1000);
    }

    #[test]
    fn test_add_get_remove() {
        let (_dir, store) = test_store();
        let key = NoteKey::new("todo", 1000);

        store.add(&key, b"buy milk").unwrap();
        assert_eq!(store.get(&key).unwrap(), b"buy milk");

        store.remove(&key).unwrap();
        assert!(matches!(
            store.get(&key),
            Err(StorageError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_add_never_overwrites() {
        let (_dir, store) = test_store();
        let key = NoteKey::new("todo", 1000);

        store.add(&key, b"first").unwrap();
        let result = store.add(&key, b"second");
        assert!(matches!(result, Err(StorageError::NoteExists(_))));

        assert_eq!(store.get(&key).unwrap(), b"first");
    }

    #[test]
    fn test_get_missing_note() {
        let (_dir, store) = test_store();
        let result = store.get(&NoteKey::new("nothing", 1000));
        assert!(matches!(result, Err(StorageError::NoteNotFound(_))));
    }

    #[test]
    fn test_remove_twice() {
        let (_dir, store) = test_store();
        let key = NoteKey::new("todo", 1000);

        store.add(&key, b"body").unwrap();
        store.remove(&key).unwrap();
        assert!(matches!(
            store.remove(&key),
            Err(StorageError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_uid_scoping() {
        let (_dir, store) = test_store();
        let a = NoteKey::new("todo", 1000);
        let b = NoteKey::new("todo", 1001);

        store.add(&a, b"a's note").unwrap();
        assert!(matches!(store.get(&b), Err(StorageError::NoteNotFound(_))));

        store.add(&b, b"b's note").unwrap();
        assert_eq!(store.get(&a).unwrap(), b"a's note");
        assert_eq!(store.get(&b).unwrap(), b"b's note");
    }

    #[test]
    fn test_get_caps_oversized_files() {
        let (_dir, store) = test_store();
        let key = NoteKey::new("big", 1000);

        let oversized = vec![b'x'; MAX_PAYLOAD_LEN + 500];
        fs::write(store.dir().join(key.file_name()), &oversized).unwrap();

        let body = store.get(&key).unwrap();
        assert_eq!(body.len(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn test_empty_body() {
        let (_dir, store) = test_store();
        let key = NoteKey::new("empty", 1000);

        store.add(&key, b"").unwrap();
        assert_eq!(store.get(&key).unwrap(), b"");
    }

    #[test]
    fn test_note_file_permissions() {
        let (_dir, store) = test_store();
        let key = NoteKey::new("todo", 1000);
        store.add(&key, b"body").unwrap();

        let mode = fs::metadata(store.dir().join(key.file_name()))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_store_directory_permissions() {
        let (_dir, store) = test_store();
        let mode = fs::metadata(store.dir()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
