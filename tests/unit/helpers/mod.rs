//! Test helper utilities

#![allow(dead_code)]

use std::collections::HashSet;

use stepwise::{Hooks, Migration, StoreError, VersionStore};

/// Context used by most runner tests.
#[derive(Debug, Default)]
pub struct Counter {
    pub value: i32,
    /// Hook and action calls in order.
    pub events: Vec<String>,
}

/// Migration adding `n` on up and subtracting it on down.
pub fn adds(version: &str, n: i32) -> Migration<Counter> {
    let up_version = version.to_string();
    let down_version = version.to_string();
    Migration::<Counter>::new(version)
        .up(move |ctx| {
            ctx.value += n;
            ctx.events.push(format!("up {}", up_version));
            Ok(())
        })
        .down(move |ctx| {
            ctx.value -= n;
            ctx.events.push(format!("down {}", down_version));
            Ok(())
        })
}

/// Migration whose up action fails with `message`.
pub fn fails_up(version: &str, message: &'static str) -> Migration<Counter> {
    Migration::<Counter>::new(version)
        .up(move |_| Err(anyhow::anyhow!(message)))
        .down(|_| Ok(()))
}

/// Hooks that only record their invocation.
pub fn recording_hooks() -> Hooks<Counter> {
    Hooks::<Counter>::none()
        .before(|ctx| {
            ctx.events.push("before".to_string());
            Ok(())
        })
        .after(|ctx| {
            ctx.events.push("after".to_string());
            Ok(())
        })
        .on_error(|ctx, err| {
            ctx.events.push(format!("on_error {}", err));
            Ok(())
        })
}

/// Store failing selected operations.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub versions: HashSet<String>,
    pub fail_setup: bool,
    pub fail_lookup: bool,
    pub fail_add: bool,
    pub fail_remove: bool,
}

impl VersionStore for FlakyStore {
    fn setup(&mut self) -> Result<(), StoreError> {
        if self.fail_setup {
            return Err(StoreError::backend("setup refused"));
        }
        Ok(())
    }

    fn has_version(&self, version: &str) -> Result<bool, StoreError> {
        if self.fail_lookup {
            return Err(StoreError::backend("lookup refused"));
        }
        Ok(self.versions.contains(version))
    }

    fn add_version(&mut self, version: &str) -> Result<(), StoreError> {
        if self.fail_add {
            return Err(StoreError::backend("add refused"));
        }
        self.versions.insert(version.to_string());
        Ok(())
    }

    fn remove_version(&mut self, version: &str) -> Result<(), StoreError> {
        if self.fail_remove {
            return Err(StoreError::backend("remove refused"));
        }
        self.versions.remove(version);
        Ok(())
    }

    fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        let mut versions: Vec<String> = self.versions.iter().cloned().collect();
        versions.sort();
        Ok(versions)
    }
}
