//! TOML-file-backed session storage.
//!
//! Gives the host a persistent store that survives restarts, the way the
//! modeled deployment's storage survives page reloads.  The whole store is
//! one small TOML table:
//!
//! ```toml
//! [entries]
//! sessionToken = "abc123"
//! ```
//!
//! Reads are served from an in-memory copy; every write goes through to the
//! file immediately (write-through, matching the synchronous storage model).
//! A missing file is an empty store, not an error, so first runs need no
//! setup.
//!
//! # Single-context backend
//!
//! A file-backed store has no peer contexts, so it never produces
//! [`tabsync_core::StorageChange`] events.  A host running on this backend
//! simply never hears remote changes; the inbound port stays quiet.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use tabsync_core::{SessionValue, StorageAreaId, StorageKey};

use crate::application::ports::SessionStorage;

/// Error type for storage file operations.
#[derive(Debug, Error)]
pub enum StorageFileError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing session store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse session store TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The store could not be serialized to TOML.
    #[error("failed to serialize session store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk schema.  `BTreeMap` keeps the file diff-stable across writes.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// A [`SessionStorage`] backed by a TOML file.
pub struct FileSessionStorage {
    path: PathBuf,
    area: StorageAreaId,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStorage {
    /// Opens the store at `path`, creating an empty one if the file does not
    /// exist.
    ///
    /// The area identity is minted per open: change-event filtering only has
    /// meaning within a single host run.
    ///
    /// # Errors
    ///
    /// Returns [`StorageFileError::Io`] for file-system errors other than
    /// "not found", and [`StorageFileError::Parse`] if the TOML is malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageFileError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<StoreFile>(&content)?.entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageFileError::Io {
                    path,
                    source: e,
                })
            }
        };

        Ok(Self {
            path,
            area: StorageAreaId::new(),
            entries: Mutex::new(entries),
        })
    }

    /// The path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageFileError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|source| StorageFileError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = toml::to_string_pretty(&StoreFile {
            entries: entries.clone(),
        })?;
        std::fs::write(&self.path, content).map_err(|source| StorageFileError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn area_id(&self) -> StorageAreaId {
        self.area
    }

    fn get(&self, key: &StorageKey) -> Option<SessionValue> {
        self.entries
            .lock()
            .get(key.as_str())
            .map(|v| SessionValue::new(v.clone()))
    }

    /// Overwrites the in-memory entry and writes the file through.
    ///
    /// The storage port is infallible by contract, so a failed file write is
    /// logged and the in-memory state stays authoritative for this run.
    fn set(&self, key: &StorageKey, value: &SessionValue) {
        let mut entries = self.entries.lock();
        entries.insert(key.as_str().to_string(), value.as_str().to_string());
        if let Err(e) = self.persist(&entries) {
            error!(key = %key, "failed to persist session store: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
