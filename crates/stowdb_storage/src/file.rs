//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// A file-based storage backend.
///
/// This backend keeps one open handle to the backing file for its whole
/// lifetime. Every [`replace`](StorageBackend::replace) truncates the file
/// and rewrites it from offset zero.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
/// Internal locking ensures consistent access.
///
/// # Example
///
/// ```no_run
/// use stowdb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::create(Path::new("data.stow")).unwrap();
/// backend.replace(b"[]").unwrap();
/// backend.sync().unwrap();  // Ensure data is durable
/// ```
#[derive(Debug)]
pub struct FileBackend {
    file: RwLock<File>,
    size: RwLock<u64>,
}

impl FileBackend {
    /// Opens an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is a directory, does not exist, or
    /// cannot be opened for reading and writing.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if path.is_dir() {
            return Err(StorageError::IsDirectory {
                path: path.to_path_buf(),
            });
        }

        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file)
    }

    /// Creates a new, empty file.
    ///
    /// Fails if the file already exists, so an existing blob is never
    /// clobbered by accident.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists or cannot be created.
    pub fn create(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;
        Self::from_file(file)
    }

    /// Creates a new file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be created.
    pub fn create_with_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::create(path)
    }

    fn from_file(file: File) -> StorageResult<Self> {
        let size = file.metadata()?.len();

        Ok(Self {
            file: RwLock::new(file),
            size: RwLock::new(size),
        })
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        let mut file = self.file.write();

        // The file is re-measured instead of trusting the cached size:
        // the file on disk is authoritative.
        let size = file.metadata()?.len();
        let capacity = usize::try_from(size).map_err(|_| StorageError::TooLarge { size })?;

        file.seek(SeekFrom::Start(0))?;
        let mut buffer = Vec::with_capacity(capacity);
        file.read_to_end(&mut buffer)?;

        *self.size.write() = buffer.len() as u64;
        Ok(buffer)
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut file = self.file.write();
        let mut size = self.size.write();

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(data)?;
        *size = data.len() as u64;

        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        let file = self.file.write();
        file.sync_all()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_create_new() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");

        let backend = FileBackend::create(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn file_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");
        std::fs::write(&path, b"[]").unwrap();

        assert!(FileBackend::create(&path).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn file_open_missing_fails() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open(&dir.path().join("missing.stow"));
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn file_open_directory_fails() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open(dir.path());
        assert!(matches!(result, Err(StorageError::IsDirectory { .. })));
    }

    #[test]
    fn file_replace_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.replace(b"hello world").unwrap();

        assert_eq!(backend.size().unwrap(), 11);
        assert_eq!(backend.read_all().unwrap(), b"hello world");
    }

    #[test]
    fn file_replace_shorter_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.replace(b"a much longer blob").unwrap();
        backend.replace(b"short").unwrap();

        assert_eq!(backend.read_all().unwrap(), b"short");
        assert_eq!(std::fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");

        // Write data
        {
            let mut backend = FileBackend::create(&path).unwrap();
            backend.replace(b"persistent data").unwrap();
            backend.sync().unwrap();
        }

        // Reopen and read
        {
            let backend = FileBackend::open(&path).unwrap();
            assert_eq!(backend.size().unwrap(), 15);
            assert_eq!(backend.read_all().unwrap(), b"persistent data");
        }
    }

    #[test]
    fn file_read_sees_external_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.replace(b"mine").unwrap();
        backend.sync().unwrap();

        std::fs::write(&path, b"someone else's").unwrap();
        assert_eq!(backend.read_all().unwrap(), b"someone else's");
        assert_eq!(backend.size().unwrap(), 14);
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("test.stow");

        let backend = FileBackend::create_with_dirs(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn file_flush_and_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stow");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.replace(b"data").unwrap();

        assert!(backend.flush().is_ok());
        assert!(backend.sync().is_ok());
    }
}
