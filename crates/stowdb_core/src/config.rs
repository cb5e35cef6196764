//! Store configuration.

use crate::crypto::Cipher;
use crate::error::{StoreError, StoreResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// File extension every backing file must carry (without the dot).
pub const EXTENSION: &str = "stow";

/// Where the authoritative collection lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// A process-local cache is authoritative. The backing file, if any,
    /// is written only by an explicit `commit`.
    #[default]
    InMemory,
    /// The backing file is authoritative. Every read decodes it and every
    /// write replaces it.
    Strict,
}

impl Mode {
    /// Canonical textual form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::InMemory => "in-memory",
            Mode::Strict => "strict",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "in_memory" | "inmemory" | "memory" => Ok(Mode::InMemory),
            "strict" => Ok(Mode::Strict),
            _ => Err(StoreError::invalid_mode(s)),
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = StoreError;

    fn try_from(value: u8) -> StoreResult<Self> {
        match value {
            0 => Ok(Mode::InMemory),
            1 => Ok(Mode::Strict),
            other => Err(StoreError::invalid_mode(other.to_string())),
        }
    }
}

/// The durable location behind a store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Location {
    /// No durable storage. The store is purely ephemeral.
    #[default]
    NoWrite,
    /// A backing file, which must end in `.stow`.
    Path(PathBuf),
}

impl Location {
    /// Returns the backing path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Location::NoWrite => None,
            Location::Path(path) => Some(path),
        }
    }

    /// Returns `true` for [`Location::NoWrite`].
    #[must_use]
    pub fn is_no_write(&self) -> bool {
        matches!(self, Location::NoWrite)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::NoWrite => f.write_str("<no-write>"),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        if path.as_os_str().is_empty() {
            Location::NoWrite
        } else {
            Location::Path(path)
        }
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::from(path.to_path_buf())
    }
}

impl From<&PathBuf> for Location {
    fn from(path: &PathBuf) -> Self {
        Location::from(path.clone())
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::from(PathBuf::from(path))
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Location::from(PathBuf::from(path))
    }
}

/// Configuration for opening a store.
#[derive(Clone)]
pub struct Config {
    /// Persistence mode.
    pub mode: Mode,

    /// Backing file, or [`Location::NoWrite`].
    pub location: Location,

    /// Byte transform applied to the whole blob at rest.
    pub cipher: Option<Arc<dyn Cipher>>,

    /// Whether to create missing parent directories of a new backing file.
    pub create_dirs: bool,

    /// Whether to `fsync` after every write (safer but slower).
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::InMemory,
            location: Location::NoWrite,
            cipher: None,
            create_dirs: false,
            sync_on_write: true,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mode", &self.mode)
            .field("location", &self.location)
            .field("cipher", &self.cipher.as_ref().map(|_| "[REDACTED]"))
            .field("create_dirs", &self.create_dirs)
            .field("sync_on_write", &self.sync_on_write)
            .finish()
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the persistence mode.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the backing location. An empty path means no backing file.
    #[must_use]
    pub fn location(mut self, location: impl Into<Location>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the cipher applied to the stored blob.
    #[must_use]
    pub fn cipher(mut self, cipher: impl Cipher + 'static) -> Self {
        self.cipher = Some(Arc::new(cipher));
        self
    }

    /// Sets whether missing parent directories are created.
    #[must_use]
    pub fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }

    /// Sets whether every write is followed by an `fsync`.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Checks the mode/location combination and the backing path.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidExtension`] if the path lacks `.stow`
    /// - [`StoreError::IsDirectory`] if the path is a directory
    /// - [`StoreError::StrictWithoutBacking`] for strict mode without a path
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(path) = self.location.path() {
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                return Err(StoreError::invalid_extension(path));
            }
            if path.is_dir() {
                return Err(StoreError::is_directory(path));
            }
        }

        if self.mode == Mode::Strict && self.location.is_no_write() {
            return Err(StoreError::StrictWithoutBacking);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::InMemory);
        assert!(config.location.is_no_write());
        assert!(config.cipher.is_none());
        assert!(config.sync_on_write);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .mode(Mode::Strict)
            .location("data/users.stow")
            .create_dirs(true)
            .sync_on_write(false);

        assert_eq!(config.mode, Mode::Strict);
        assert_eq!(config.location.path(), Some(Path::new("data/users.stow")));
        assert!(config.create_dirs);
        assert!(!config.sync_on_write);
    }

    #[test]
    fn empty_path_is_no_write() {
        assert_eq!(Location::from(""), Location::NoWrite);
        assert_eq!(Location::from(PathBuf::new()), Location::NoWrite);
        assert_eq!(
            Location::from("a.stow"),
            Location::Path(PathBuf::from("a.stow"))
        );
    }

    #[test]
    fn parse_modes() {
        assert_eq!("strict".parse::<Mode>().unwrap(), Mode::Strict);
        assert_eq!("In-Memory".parse::<Mode>().unwrap(), Mode::InMemory);
        assert_eq!(Mode::try_from(1u8).unwrap(), Mode::Strict);
        assert!(matches!(
            "eventual".parse::<Mode>(),
            Err(StoreError::InvalidMode { .. })
        ));
        assert!(matches!(
            Mode::try_from(7u8),
            Err(StoreError::InvalidMode { .. })
        ));
        assert_eq!(Mode::Strict.to_string(), "strict");
    }

    #[test]
    fn validate_extension() {
        let bad = Config::new().location("users.json");
        assert!(matches!(
            bad.validate(),
            Err(StoreError::InvalidExtension { .. })
        ));

        let none = Config::new().location("users");
        assert!(matches!(
            none.validate(),
            Err(StoreError::InvalidExtension { .. })
        ));

        assert!(Config::new().location("users.stow").validate().is_ok());
    }

    #[test]
    fn validate_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("looks_like.stow");
        std::fs::create_dir(&path).unwrap();

        let config = Config::new().location(path);
        assert!(matches!(
            config.validate(),
            Err(StoreError::IsDirectory { .. })
        ));
    }

    #[test]
    fn strict_needs_backing() {
        let config = Config::new().mode(Mode::Strict);
        assert!(matches!(
            config.validate(),
            Err(StoreError::StrictWithoutBacking)
        ));
    }
}
