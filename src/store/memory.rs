//! In-memory version store.

use std::collections::HashMap;

use super::VersionStore;
use crate::error::StoreError;

/// Map from version to applied flag.
///
/// Removing a version leaves a `false` tombstone instead of deleting the
/// key; lookups of unknown versions report "not applied". Never fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryVersionStore {
    versions: HashMap<String, bool>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with applied versions.
    pub fn with_versions<I, V>(versions: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            versions: versions.into_iter().map(|v| (v.into(), true)).collect(),
        }
    }

    /// True if the version was ever added, even if later removed.
    pub fn has_record(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }
}

impl VersionStore for MemoryVersionStore {
    fn setup(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn has_version(&self, version: &str) -> Result<bool, StoreError> {
        Ok(self.versions.get(version).copied().unwrap_or(false))
    }

    fn add_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.versions.insert(version.to_string(), true);
        Ok(())
    }

    fn remove_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.versions.insert(version.to_string(), false);
        Ok(())
    }

    fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        let mut applied: Vec<String> = self
            .versions
            .iter()
            .filter(|(_, applied)| **applied)
            .map(|(version, _)| version.clone())
            .collect();
        applied.sort();
        Ok(applied)
    }
}
