//! File-based snapshot backend for persistent storage.

use crate::backend::SnapshotBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// A file-based snapshot backend.
///
/// The snapshot lives in a single file. Every save writes the new snapshot
/// to a sibling temporary file, syncs it, and renames it over the target, so
/// a crash mid-save never leaves a torn snapshot.
///
/// # Thread Safety
///
/// Saves are serialized through an internal lock; concurrent loads read the
/// last fully renamed snapshot.
///
/// # Example
///
/// ```no_run
/// use shule_persist::{FileBackend, SnapshotBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("survey.json")).unwrap();
/// backend.save(b"{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    // Serializes save() so two writers cannot race on the temp file.
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file does not have to exist yet; `load` returns `None` until the
    /// first `save`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no parent directory to write the
    /// temporary file into.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if path.file_name().is_none() {
            return Err(StorageError::InvalidPath(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn save(&self, bytes: &[u8]) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        let temp = self.temp_path();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("survey.json")).unwrap();
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(&dir.path().join("survey.json")).unwrap();

        backend.save(b"{\"sites\":[]}").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"{\"sites\":[]}".to_vec()));

        backend.save(b"{}").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");

        let backend = FileBackend::open(&path).unwrap();
        backend.save(b"persisted").unwrap();
        drop(backend);

        let reopened = FileBackend::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(b"persisted".to_vec()));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");
        let backend = FileBackend::open(&path).unwrap();

        backend.save(b"data").unwrap();
        assert!(!backend.temp_path().exists());
    }

    #[test]
    fn create_dirs_builds_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("survey.json");
        let backend = FileBackend::open_with_create_dirs(&nested).unwrap();
        backend.save(b"x").unwrap();
        assert!(nested.exists());
    }
}
