//! stepwise - ordered, reversible schema migrations
//!
//! Register migrations in a [`Registry`], pick a [`VersionStore`], and let a
//! [`Runner`] apply what is pending or roll back the newest applied
//! migration. The context type threaded through every action and hook is
//! chosen by the application.
//!
//! ```
//! use stepwise::{Migration, MemoryVersionStore, Registry, Runner};
//!
//! let mut registry = Registry::new()
//!     .with(Migration::<Vec<String>>::new("20250101_000000").up(|log| {
//!         log.push("create users".to_string());
//!         Ok(())
//!     }));
//! let mut log = Vec::new();
//! let mut runner = Runner::new(&mut registry, MemoryVersionStore::new(), &mut log);
//! let report = runner.run()?;
//! assert_eq!(report.applied, vec!["20250101_000000"]);
//! # Ok::<(), stepwise::MigrationError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod hooks;
pub mod migration;
pub mod registry;
pub mod runner;
pub mod scaffold;
pub mod store;

pub use config::Config;
pub use error::{HookStage, MigrationError, StoreError};
pub use hooks::Hooks;
pub use migration::{Action, Direction, Migration};
pub use registry::Registry;
pub use runner::{MigrationStatus, RunReport, Runner};
pub use scaffold::Scaffolder;
pub use store::{FileVersionStore, MemoryVersionStore, VersionStore};
