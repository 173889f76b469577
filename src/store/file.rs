//! JSON ledger version store.
//!
//! The ledger is a small JSON document:
//!
//! ```json
//! {
//!   "applied": [
//!     { "version": "20250119_100000", "applied_at": "2025-01-19T10:00:03+00:00" }
//!   ]
//! }
//! ```
//!
//! Every change rewrites the file atomically. While the store is set up it
//! holds a `<ledger>.lock` file so two processes cannot migrate at once.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::VersionStore;
use crate::error::StoreError;
use crate::files::atomic_write;
use crate::files::lock::LedgerLock;

/// One applied migration as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedVersion {
    pub version: String,
    /// RFC 3339 timestamp of when the version was recorded.
    pub applied_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Ledger {
    #[serde(default)]
    applied: Vec<AppliedVersion>,
}

/// Version store persisted as a JSON file.
#[derive(Debug)]
pub struct FileVersionStore {
    path: PathBuf,
    applied: Vec<AppliedVersion>,
    locking: bool,
    lock: Option<LedgerLock>,
}

impl FileVersionStore {
    /// Store backed by the ledger at `path`. Nothing touches the disk until `setup`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            applied: Vec::new(),
            locking: true,
            lock: None,
        }
    }

    /// Skip the lock file (single-process tools, tests).
    pub fn without_lock(mut self) -> Self {
        self.locking = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ledger entries loaded by the last `setup`, sorted by version.
    pub fn entries(&self) -> &[AppliedVersion] {
        &self.applied
    }

    /// Read a ledger without locking it. A missing file is an empty ledger.
    pub fn read_ledger(path: &Path) -> Result<Vec<AppliedVersion>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let ledger: Ledger = serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let mut applied = ledger.applied;
        applied.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(applied)
    }

    /// Write `applied` to disk. The in-memory view is only replaced by the
    /// caller once this succeeds.
    fn save(&self, applied: &[AppliedVersion]) -> Result<(), StoreError> {
        let ledger = Ledger {
            applied: applied.to_vec(),
        };
        let json = serde_json::to_string_pretty(&ledger).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn position(&self, version: &str) -> Result<usize, usize> {
        self.applied
            .binary_search_by(|entry| entry.version.as_str().cmp(version))
    }
}

impl VersionStore for FileVersionStore {
    fn setup(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        if self.locking && self.lock.is_none() {
            self.lock = Some(LedgerLock::acquire(&self.path)?);
        }

        self.applied = Self::read_ledger(&self.path)?;
        if !self.path.exists() {
            self.save(&self.applied)?;
        }
        tracing::debug!(
            "Loaded version ledger {} ({} applied)",
            self.path.display(),
            self.applied.len()
        );
        Ok(())
    }

    fn has_version(&self, version: &str) -> Result<bool, StoreError> {
        Ok(self.position(version).is_ok())
    }

    fn add_version(&mut self, version: &str) -> Result<(), StoreError> {
        if let Err(index) = self.position(version) {
            let mut applied = self.applied.clone();
            applied.insert(
                index,
                AppliedVersion {
                    version: version.to_string(),
                    applied_at: chrono::Utc::now().to_rfc3339(),
                },
            );
            self.save(&applied)?;
            self.applied = applied;
        }
        Ok(())
    }

    fn remove_version(&mut self, version: &str) -> Result<(), StoreError> {
        if let Ok(index) = self.position(version) {
            let mut applied = self.applied.clone();
            applied.remove(index);
            self.save(&applied)?;
            self.applied = applied;
        }
        Ok(())
    }

    fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.applied.iter().map(|e| e.version.clone()).collect())
    }
}
