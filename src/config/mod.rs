//! Configuration management for stepwise

mod io;
mod types;

pub use io::CONFIG_FILE_NAME;
pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::store::is_identifier;

impl Config {
    /// Default config file path (./stepwise.toml)
    pub fn default_path() -> PathBuf {
        io::default_config_path()
    }

    /// Load ./stepwise.toml, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load_from(&Self::default_path())
    }

    /// Load configuration from a specific file, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        io::save_to(self, path)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<(), String> {
        if self.migrations.directory.trim().is_empty() {
            return Err("[migrations].directory must not be empty".to_string());
        }
        if self.migrations.context_type.trim().is_empty() {
            return Err("[migrations].context_type must not be empty".to_string());
        }
        if self.store.ledger.trim().is_empty() {
            return Err("[store].ledger must not be empty".to_string());
        }
        if !is_identifier(&self.store.table) {
            return Err(format!(
                "[store].table must be a plain identifier, got {:?}",
                self.store.table
            ));
        }
        Ok(())
    }

    /// Migrations directory with ~ expanded
    pub fn migrations_directory(&self) -> PathBuf {
        self.resolve(&self.migrations.directory)
    }

    /// Ledger path with ~ expanded
    pub fn ledger_path(&self) -> PathBuf {
        self.resolve(&self.store.ledger)
    }

    /// Expand `~/` and anchor relative paths at the config file's directory
    fn resolve(&self, path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        let path = PathBuf::from(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}
