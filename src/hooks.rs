//! Lifecycle callbacks wrapped around every migration step.
//!
//! `before` runs ahead of the action, `after` once the action and the
//! version-store update both succeeded, and `on_error` when either of those
//! failed. `on_error` can run compensating work (a transaction rollback, for
//! example) or replace the error, but it cannot suppress it: returning
//! `Ok(())` still surfaces the original failure.

use std::fmt;

use crate::error::MigrationError;

pub type HookFn<C> = Box<dyn FnMut(&mut C) -> anyhow::Result<()>>;
pub type ErrorHookFn<C> = Box<dyn FnMut(&mut C, &MigrationError) -> anyhow::Result<()>>;

/// Optional before/after/on-error callbacks over the shared context.
pub struct Hooks<C> {
    pub(crate) before: Option<HookFn<C>>,
    pub(crate) after: Option<HookFn<C>>,
    pub(crate) on_error: Option<ErrorHookFn<C>>,
}

impl<C> Hooks<C> {
    /// No callbacks.
    pub fn none() -> Self {
        Self {
            before: None,
            after: None,
            on_error: None,
        }
    }

    pub fn before<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut C) -> anyhow::Result<()> + 'static,
    {
        self.before = Some(Box::new(f));
        self
    }

    pub fn after<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut C) -> anyhow::Result<()> + 'static,
    {
        self.after = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut C, &MigrationError) -> anyhow::Result<()> + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.on_error.is_none()
    }
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self::none()
    }
}

impl<C> fmt::Debug for Hooks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
