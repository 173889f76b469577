//! Error types for migration runs and version stores.
//!
//! - `MigrationError` - everything `Runner::run` / `Runner::rollback` can return
//! - `StoreError` - failures reported by a `VersionStore` backend
//!
//! Errors coming out of user code (migration actions and hooks) are kept as
//! boxed trait objects so the original message reaches the caller unchanged.

use std::fmt;
use std::path::PathBuf;

use crate::migration::Direction;

/// Boxed error produced by user code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Lifecycle hook that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Before,
    After,
    OnError,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::Before => write!(f, "before"),
            HookStage::After => write!(f, "after"),
            HookStage::OnError => write!(f, "on_error"),
        }
    }
}

/// Errors reported by a version store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Version ledger I/O failed ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version ledger is not valid JSON ({}): {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "sqlite")]
    #[error("SQLite version store failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Version ledger {} is locked by process {pid} (since {started})", path.display())]
    Locked {
        path: PathBuf,
        pid: u32,
        started: String,
    },

    #[error("Invalid version table name: {0:?}")]
    InvalidTable(String),

    #[error(transparent)]
    Backend(BoxError),
}

impl StoreError {
    /// Wrap an arbitrary backend error (for stores implemented outside this crate).
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        StoreError::Backend(err.into())
    }
}

/// Errors returned by a migration run or rollback.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Version store initialization failed; no migration was touched.
    #[error("Failed to set up version store: {0}")]
    Setup(#[source] StoreError),

    /// The version store could not tell whether a migration is applied.
    #[error("Failed to look up migration {version:?} in the version store: {source}")]
    Lookup {
        version: String,
        #[source]
        source: StoreError,
    },

    /// The migration has no action for the requested direction.
    #[error("No {direction} action for migration {version:?}")]
    MissingAction { version: String, direction: Direction },

    /// The migration's own up/down logic failed.
    #[error("Migration {version:?} failed ({direction}): {source}")]
    Action {
        version: String,
        direction: Direction,
        #[source]
        source: BoxError,
    },

    /// The action succeeded but the version store could not record it.
    #[error("Migration {version:?} ran ({direction}) but the version store was not updated: {source}")]
    Bookkeeping {
        version: String,
        direction: Direction,
        #[source]
        source: StoreError,
    },

    /// A lifecycle hook failed.
    #[error("The {stage} hook failed for migration {version:?}: {source}")]
    Hook {
        stage: HookStage,
        version: String,
        #[source]
        source: BoxError,
    },
}

impl MigrationError {
    /// Version of the migration the error belongs to, if any.
    pub fn version(&self) -> Option<&str> {
        match self {
            MigrationError::Setup(_) => None,
            MigrationError::Lookup { version, .. }
            | MigrationError::MissingAction { version, .. }
            | MigrationError::Action { version, .. }
            | MigrationError::Bookkeeping { version, .. }
            | MigrationError::Hook { version, .. } => Some(version),
        }
    }
}
