//! Ordered collection of migrations.
//!
//! Declaration order does not matter: the runner sorts the registry by
//! version before every run (ascending) and rollback (descending).

use std::collections::BTreeMap;
use std::fmt;

use crate::migration::Migration;

/// Insertion-ordered list of migrations owned by the application.
pub struct Registry<C> {
    migrations: Vec<Migration<C>>,
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self {
            migrations: Vec::new(),
        }
    }

    /// Append a migration. Version uniqueness is the caller's responsibility;
    /// see [`Registry::duplicate_versions`].
    pub fn add(&mut self, migration: Migration<C>) {
        self.migrations.push(migration);
    }

    /// Builder-style [`Registry::add`].
    pub fn with(mut self, migration: Migration<C>) -> Self {
        self.add(migration);
        self
    }

    pub fn get(&self, index: usize) -> Option<&Migration<C>> {
        self.migrations.get(index)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Migration<C>> {
        self.migrations.iter()
    }

    /// Versions in current order.
    pub fn versions(&self) -> Vec<&str> {
        self.migrations.iter().map(|m| m.version()).collect()
    }

    /// Stable sort, oldest version first.
    pub fn sort_ascending(&mut self) {
        self.migrations.sort_by(|a, b| a.version().cmp(b.version()));
    }

    /// Stable sort, newest version first.
    pub fn sort_descending(&mut self) {
        self.migrations.sort_by(|a, b| b.version().cmp(a.version()));
    }

    /// Versions registered more than once, sorted.
    pub fn duplicate_versions(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for migration in &self.migrations {
            *counts.entry(migration.version()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(version, _)| version.to_string())
            .collect()
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("versions", &self.versions())
            .finish()
    }
}

impl<C> Extend<Migration<C>> for Registry<C> {
    fn extend<I: IntoIterator<Item = Migration<C>>>(&mut self, iter: I) {
        self.migrations.extend(iter);
    }
}

impl<C> FromIterator<Migration<C>> for Registry<C> {
    fn from_iter<I: IntoIterator<Item = Migration<C>>>(iter: I) -> Self {
        Self {
            migrations: iter.into_iter().collect(),
        }
    }
}

impl<'a, C> IntoIterator for &'a Registry<C> {
    type Item = &'a Migration<C>;
    type IntoIter = std::slice::Iter<'a, Migration<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
