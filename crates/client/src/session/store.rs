//! Durable persistence for the session record.
//!
//! The store writes the whole [`AdminSession`] as one value through a
//! [`StorageBackend`], so a reader can never observe a token without its
//! profile. Read failures degrade to "no session" (fail closed); write
//! failures are surfaced to the caller without corrupting what was there
//! before.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::AdminSession;

/// Errors from the underlying storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The medium could not be read or written.
    #[error("session storage io error: {0}")]
    Io(#[from] io::Error),

    /// The session record could not be serialized.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A place the serialized session record can live.
///
/// Implementations must be safe to share across tasks; the console only
/// ever reads and writes in direct response to discrete user or network
/// events, so no coordination beyond interior mutability is needed.
pub trait StorageBackend: Send + Sync {
    /// Read the raw record, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the medium cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the raw record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the medium cannot be written.
    fn write(&self, raw: &str) -> Result<(), StorageError>;

    /// Remove the record. Removing an absent record is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the medium cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON file, replaced atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create storage at the given path. Parent directories are created on
    /// first write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, raw: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash mid-write cannot leave a torn record.
        let tmp = self.temp_path();
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn write(&self, raw: &str) -> Result<(), StorageError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(raw.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

/// The session store: at most one [`AdminSession`], persisted as one record.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
}

impl SessionStore {
    /// Create a store over the given backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Persist the session, overwriting any previous session of either role.
    ///
    /// The record is written in one operation; no partially-written state is
    /// observable through [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record cannot be serialized or the
    /// medium cannot be written. A failed save leaves the previous record
    /// intact.
    pub fn save(&self, session: &AdminSession) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.backend.write(&raw)
    }

    /// Load the stored session, if any.
    ///
    /// Fails closed: an unreadable or unparseable record is treated as "no
    /// session" (with a warning logged) rather than an error, since validity
    /// is only ever decided by the server on next use. Idempotent.
    #[must_use]
    pub fn load(&self) -> Option<AdminSession> {
        let raw = match self.backend.read() {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; treating as logged out");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is malformed; treating as logged out");
                None
            }
        }
    }

    /// Remove the stored session. Used on logout and on 401 invalidation.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the medium cannot be modified.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.clear()
    }
}
