//! Test fixtures and store helpers.
//!
//! Provides sample record types and convenience functions for setting up
//! stores in either mode.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stowdb_codec::{Codec, JsonCodec};
use stowdb_core::{Config, Mode, Record, Store};
use stowdb_storage::InMemoryBackend;
use tempfile::TempDir;

/// A small record type used throughout the tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Contact address, if known.
    pub email: Option<String>,
}

impl Person {
    /// Creates a person without an email address.
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
            email: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Returns `count` distinct people with ages `20..20 + count`.
pub fn sample_people(count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| {
            let age = 20 + u32::try_from(i).expect("sample too large");
            Person::new(format!("person-{i}"), age).with_email(format!("p{i}@example.com"))
        })
        .collect()
}

/// A test store with automatic cleanup.
pub struct TestStore<T: Record = Person, C: Codec = JsonCodec> {
    /// The store instance.
    pub store: Store<T, C>,
    /// The backing file, if any.
    path: Option<PathBuf>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl<T: Record> TestStore<T> {
    /// Creates a new ephemeral in-memory store.
    pub fn memory() -> Self {
        Self {
            store: Store::in_memory().expect("Failed to open in-memory store"),
            path: None,
            _temp_dir: None,
        }
    }

    /// Creates a new file-backed store in a temporary directory.
    pub fn file(mode: Mode) -> Self {
        Self::file_with_codec(mode, JsonCodec)
    }
}

impl<T: Record, C: Codec + Clone> TestStore<T, C> {
    /// Creates a new file-backed store using `codec`.
    pub fn file_with_codec(mode: Mode, codec: C) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("test.stow");
        let config = Config::new().mode(mode).location(&path).sync_on_write(false);
        let store = Store::open_with_codec(config, codec).expect("Failed to open file store");

        Self {
            store,
            path: Some(path),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the backing file path if file-based, None if ephemeral.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the store and opens the same file again in `mode`.
    ///
    /// # Panics
    ///
    /// Panics if the store is ephemeral.
    pub fn reopen(self, mode: Mode) -> Self {
        let Self {
            store,
            path,
            _temp_dir,
        } = self;
        let codec = store.codec().clone();
        drop(store);

        let path = path.expect("Only file stores can be reopened");
        let config = Config::new().mode(mode).location(&path).sync_on_write(false);
        let store = Store::open_with_codec(config, codec).expect("Failed to reopen store");

        Self {
            store,
            path: Some(path),
            _temp_dir,
        }
    }
}

impl<T: Record, C: Codec> std::ops::Deref for TestStore<T, C> {
    type Target = Store<T, C>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Opens a store over an [`InMemoryBackend`] and returns an observer clone
/// of the backend for inspecting what the store wrote.
pub fn backed_store<T: Record>(mode: Mode) -> (Store<T>, InMemoryBackend) {
    let backend = InMemoryBackend::new();
    let observer = backend.clone();
    let store = Store::open_with_backend(backend, Config::new().mode(mode), JsonCodec)
        .expect("Failed to open backed store");
    (store, observer)
}

/// Runs a test with a temporary in-memory store of [`Person`] records.
///
/// # Example
///
/// ```rust
/// use stowdb_testkit::{with_temp_store, Person};
///
/// with_temp_store(|store| {
///     store.insert([Person::new("ada", 36)]).unwrap();
///     assert_eq!(store.len().unwrap(), 1);
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&Store<Person>) -> R,
{
    let test_store = TestStore::memory();
    f(&test_store.store)
}

/// Runs a test with a temporary file-backed store of [`Person`] records.
pub fn with_file_store<F, R>(mode: Mode, f: F) -> R
where
    F: FnOnce(&Store<Person>, &Path) -> R,
{
    let test_store = TestStore::file(mode);
    let path = test_store
        .path()
        .expect("File store should have a path")
        .to_path_buf();
    f(&test_store.store, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a file-backed store pre-populated with `count` people.
    ///
    /// In-memory stores are committed so the file matches the cache.
    pub fn populated_store(count: usize, mode: Mode) -> TestStore {
        let test_store = TestStore::file(mode);
        test_store
            .insert(sample_people(count))
            .expect("Failed to insert sample people");
        if mode == Mode::InMemory {
            test_store.commit().expect("Failed to commit");
        }
        test_store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowdb_codec::CborCodec;

    #[test]
    fn test_memory_store() {
        let store: TestStore = TestStore::memory();
        assert!(store.path().is_none());
        assert!(!store.has_backing());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_file_store() {
        let store: TestStore = TestStore::file(Mode::Strict);
        let path = store.path().unwrap().to_path_buf();
        assert!(path.exists());

        store.insert(sample_people(2)).unwrap();
        let on_disk: Vec<Person> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, sample_people(2));
    }

    #[test]
    fn test_reopen_switches_mode() {
        let store: TestStore = scenarios::populated_store(5, Mode::InMemory);
        let store = store.reopen(Mode::Strict);
        assert_eq!(store.mode(), Mode::Strict);
        assert_eq!(store.get_collection().unwrap(), sample_people(5));
    }

    #[test]
    fn test_reopen_keeps_codec() {
        let store: TestStore<Person, CborCodec> =
            TestStore::file_with_codec(Mode::Strict, CborCodec);
        store.insert(sample_people(3)).unwrap();
        let store = store.reopen(Mode::InMemory);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_backed_store_observer() {
        let (store, observer) = backed_store::<Person>(Mode::Strict);
        store.insert([Person::new("ada", 36)]).unwrap();
        assert_eq!(observer.replace_count(), 2);
    }

    #[test]
    fn test_with_file_store() {
        with_file_store(Mode::Strict, |store, path| {
            store.insert([Person::new("ada", 36)]).unwrap();
            assert!(std::fs::metadata(path).unwrap().len() > 2);
        });
    }

    #[test]
    fn test_sample_people_distinct() {
        let people = sample_people(10);
        let unique: std::collections::HashSet<_> = people.iter().collect();
        assert_eq!(unique.len(), 10);
        assert_eq!(people[9].age, 29);
    }
}
