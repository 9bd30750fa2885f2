//! Persistence gateway.
//!
//! A `Store` holds one opaque string: the JSON record form of the scene.
//! The session loads it once at startup and saves after every mutation.
//! Backends here are in-memory and file-per-key; the browser backend lives
//! in `fc-wasm`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure talking to a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend missing, disabled, or refused the write (quota, privacy mode).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The session could not read what the store holds and will not save
    /// over it until told to.
    #[error("stored canvas could not be read; refusing to overwrite it")]
    Protected,
}

/// Key-value persistence for a single serialized scene.
pub trait Store {
    /// The previously saved value, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the saved value.
    fn save(&mut self, json: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, json: &str) -> Result<(), StoreError> {
        (**self).save(json)
    }
}

// ─── Memory ──────────────────────────────────────────────────────────────

/// In-process store. Useful for tests and for hosts without storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `json`, as if saved by an earlier run.
    pub fn with_value(json: impl Into<String>) -> Self {
        Self {
            value: Some(json.into()),
            saves: 0,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, json: &str) -> Result<(), StoreError> {
        self.value = Some(json.to_string());
        self.saves += 1;
        Ok(())
    }
}

// ─── File ────────────────────────────────────────────────────────────────

/// Stores the value in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, json: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Replace atomically via a sibling temp file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::trace!("store: wrote {} bytes to {}", json.len(), self.path.display());
        Ok(())
    }
}
