//! Version stores: the durable record of which migrations are applied.
//!
//! The runner only talks to a store through [`VersionStore`]. Three
//! backends ship with the crate:
//!
//! - [`MemoryVersionStore`] - in-process map, never fails (tests, examples)
//! - [`FileVersionStore`] - JSON ledger on disk with a PID lock file
//! - [`SqliteVersionStore`] - `schema_migrations` table (feature `sqlite`)

mod file;
mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{AppliedVersion, FileVersionStore};
pub use memory::MemoryVersionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteContext, SqliteVersionStore};

use crate::error::StoreError;

/// Persistent set of applied migration versions.
///
/// `setup` must be idempotent: the runner calls it at the start of every
/// run and rollback. `add_version` is called once per successful `up`,
/// `remove_version` once per successful `down`.
pub trait VersionStore {
    /// Prepare the backing structure (create table, file, ...).
    fn setup(&mut self) -> Result<(), StoreError>;

    /// Whether `version` is currently applied.
    fn has_version(&self, version: &str) -> Result<bool, StoreError>;

    /// Mark `version` as applied.
    fn add_version(&mut self, version: &str) -> Result<(), StoreError>;

    /// Mark `version` as no longer applied.
    fn remove_version(&mut self, version: &str) -> Result<(), StoreError>;

    /// All applied versions, sorted ascending.
    fn applied_versions(&self) -> Result<Vec<String>, StoreError>;
}

/// True for a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl<S: VersionStore + ?Sized> VersionStore for &mut S {
    fn setup(&mut self) -> Result<(), StoreError> {
        (**self).setup()
    }

    fn has_version(&self, version: &str) -> Result<bool, StoreError> {
        (**self).has_version(version)
    }

    fn add_version(&mut self, version: &str) -> Result<(), StoreError> {
        (**self).add_version(version)
    }

    fn remove_version(&mut self, version: &str) -> Result<(), StoreError> {
        (**self).remove_version(version)
    }

    fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        (**self).applied_versions()
    }
}

impl<S: VersionStore + ?Sized> VersionStore for Box<S> {
    fn setup(&mut self) -> Result<(), StoreError> {
        (**self).setup()
    }

    fn has_version(&self, version: &str) -> Result<bool, StoreError> {
        (**self).has_version(version)
    }

    fn add_version(&mut self, version: &str) -> Result<(), StoreError> {
        (**self).add_version(version)
    }

    fn remove_version(&mut self, version: &str) -> Result<(), StoreError> {
        (**self).remove_version(version)
    }

    fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        (**self).applied_versions()
    }
}
