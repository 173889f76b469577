//! Execution engine.
//!
//! A [`Runner`] ties together a borrowed [`Registry`], an owned
//! [`VersionStore`], a borrowed context and a set of [`Hooks`]. It applies
//! pending migrations oldest-first and rolls back one migration at a time,
//! newest-first. Everything runs sequentially on the calling thread.
//!
//! Each migration step goes through the same cycle:
//!
//! 1. the requested action must exist, otherwise `MissingAction` (no hooks run)
//! 2. `before` hook; a failure stops here and skips `on_error`
//! 3. the action, then the version store update
//! 4. if either failed, `on_error` sees the error; the original error is
//!    returned unless `on_error` fails itself
//! 5. otherwise the `after` hook

use tracing::{debug, info, warn};

use crate::error::{HookStage, MigrationError};
use crate::hooks::Hooks;
use crate::migration::{Action, Direction, Migration};
use crate::registry::Registry;
use crate::store::VersionStore;

/// Outcome of a successful [`Runner::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Versions applied by this call, in order.
    pub applied: Vec<String>,
    /// Versions that were already applied.
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Applied state of a single registered migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: String,
    pub applied: bool,
    /// False if the migration has no `down` action.
    pub reversible: bool,
}

/// Sequences the migrations of a registry against a version store.
pub struct Runner<'r, C, S: VersionStore> {
    registry: &'r mut Registry<C>,
    store: S,
    context: &'r mut C,
    hooks: Hooks<C>,
}

impl<'r, C, S: VersionStore> Runner<'r, C, S> {
    /// Runner without hooks.
    pub fn new(registry: &'r mut Registry<C>, store: S, context: &'r mut C) -> Self {
        Self {
            registry,
            store,
            context,
            hooks: Hooks::none(),
        }
    }

    /// Replace the hook set.
    pub fn with_hooks(mut self, hooks: Hooks<C>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Apply every pending migration, oldest version first.
    ///
    /// Stops at the first error. Migrations applied before the failure stay
    /// recorded; nothing after it runs. An error raised by a migration's own
    /// action comes back as [`MigrationError::Action`], whose `source()` is
    /// the error the action returned.
    pub fn run(&mut self) -> Result<RunReport, MigrationError> {
        self.setup()?;
        self.warn_duplicates();
        self.registry.sort_ascending();

        let mut report = RunReport::default();
        let (registry, mut cycle) = self.split();
        for migration in registry.iter() {
            let version = migration.version();
            if cycle.is_applied(version)? {
                debug!("Skipping {} (already applied)", version);
                report.skipped.push(version.to_string());
                continue;
            }
            cycle.step(migration, Direction::Up)?;
            info!("Applied migration {}", version);
            report.applied.push(version.to_string());
        }

        Ok(report)
    }

    /// Revert the applied migration with the greatest version.
    ///
    /// Returns the reverted version, or `None` if nothing is applied.
    pub fn rollback(&mut self) -> Result<Option<String>, MigrationError> {
        self.setup()?;
        self.warn_duplicates();
        self.registry.sort_descending();

        let (registry, mut cycle) = self.split();
        for migration in registry.iter() {
            let version = migration.version();
            if !cycle.is_applied(version)? {
                continue;
            }
            cycle.step(migration, Direction::Down)?;
            info!("Rolled back migration {}", version);
            return Ok(Some(version.to_string()));
        }

        debug!("Nothing to roll back");
        Ok(None)
    }

    /// Applied state of every registered migration, oldest first. Runs nothing.
    pub fn status(&mut self) -> Result<Vec<MigrationStatus>, MigrationError> {
        self.setup()?;
        self.registry.sort_ascending();

        let mut statuses = Vec::with_capacity(self.registry.len());
        for migration in self.registry.iter() {
            let version = migration.version().to_string();
            let applied = self
                .store
                .has_version(&version)
                .map_err(|source| MigrationError::Lookup {
                    version: version.clone(),
                    source,
                })?;
            statuses.push(MigrationStatus {
                version,
                applied,
                reversible: migration.action(Direction::Down).is_present(),
            });
        }
        Ok(statuses)
    }

    /// Versions `run` would apply, in order.
    pub fn pending(&mut self) -> Result<Vec<String>, MigrationError> {
        Ok(self
            .status()?
            .into_iter()
            .filter(|s| !s.applied)
            .map(|s| s.version)
            .collect())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn context(&self) -> &C {
        self.context
    }

    pub fn registry(&self) -> &Registry<C> {
        self.registry
    }

    /// Give the store back, releasing the borrows of registry and context.
    pub fn into_store(self) -> S {
        self.store
    }

    fn setup(&mut self) -> Result<(), MigrationError> {
        debug!("Setting up version store");
        self.store.setup().map_err(MigrationError::Setup)
    }

    fn warn_duplicates(&self) {
        for version in self.registry.duplicate_versions() {
            warn!("Migration version {} is registered more than once", version);
        }
    }

    /// Registry for reading, plus the parts a step mutates.
    fn split(&mut self) -> (&Registry<C>, Cycle<'_, C, S>) {
        (
            &*self.registry,
            Cycle {
                store: &mut self.store,
                context: &mut *self.context,
                hooks: &mut self.hooks,
            },
        )
    }
}

/// Mutable state of one execution cycle, borrowed apart from the registry.
struct Cycle<'a, C, S> {
    store: &'a mut S,
    context: &'a mut C,
    hooks: &'a mut Hooks<C>,
}

impl<C, S: VersionStore> Cycle<'_, C, S> {
    fn is_applied(&self, version: &str) -> Result<bool, MigrationError> {
        self.store
            .has_version(version)
            .map_err(|source| MigrationError::Lookup {
                version: version.to_string(),
                source,
            })
    }

    /// One execution cycle for `migration`.
    fn step(
        &mut self,
        migration: &Migration<C>,
        direction: Direction,
    ) -> Result<(), MigrationError> {
        let version = migration.version();
        let action = match migration.action(direction) {
            Action::Present(f) => f,
            Action::Absent => {
                return Err(MigrationError::MissingAction {
                    version: version.to_string(),
                    direction,
                });
            }
        };

        if let Some(before) = self.hooks.before.as_mut() {
            before(&mut *self.context).map_err(|e| MigrationError::Hook {
                stage: HookStage::Before,
                version: version.to_string(),
                source: e.into(),
            })?;
        }

        debug!("Running {} ({})", version, direction);
        let outcome = match action(&mut *self.context) {
            Err(e) => Err(MigrationError::Action {
                version: version.to_string(),
                direction,
                source: e.into(),
            }),
            Ok(()) => {
                let recorded = match direction {
                    Direction::Up => self.store.add_version(version),
                    Direction::Down => self.store.remove_version(version),
                };
                recorded.map_err(|source| MigrationError::Bookkeeping {
                    version: version.to_string(),
                    direction,
                    source,
                })
            }
        };

        if let Err(err) = outcome {
            return Err(self.handle_failure(version, err));
        }

        if let Some(after) = self.hooks.after.as_mut() {
            after(&mut *self.context).map_err(|e| MigrationError::Hook {
                stage: HookStage::After,
                version: version.to_string(),
                source: e.into(),
            })?;
        }

        Ok(())
    }

    /// Give `on_error` a look at `err`. Its own failure replaces `err`.
    fn handle_failure(&mut self, version: &str, err: MigrationError) -> MigrationError {
        let Some(on_error) = self.hooks.on_error.as_mut() else {
            return err;
        };
        match on_error(&mut *self.context, &err) {
            Ok(()) => err,
            Err(replacement) => {
                warn!("on_error hook replaced error: {}", err);
                MigrationError::Hook {
                    stage: HookStage::OnError,
                    version: version.to_string(),
                    source: replacement.into(),
                }
            }
        }
    }
}

impl<C, S: VersionStore + std::fmt::Debug> std::fmt::Debug for Runner<'_, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("registry", &self.registry)
            .field("store", &self.store)
            .field("hooks", &self.hooks)
            .finish()
    }
}
