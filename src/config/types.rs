//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure (`stepwise.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub migrations: MigrationsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Directory relative paths resolve against (computed, not stored in config)
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Where migration sources live and how they are generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Directory holding the generated migration modules
    #[serde(default = "default_migrations_directory")]
    pub directory: String,
    /// Rust path of the context type used in generated code
    #[serde(default = "default_context_type")]
    pub context_type: String,
}

pub fn default_migrations_directory() -> String {
    "migrations".to_string()
}

pub fn default_context_type() -> String {
    "crate::MigrationContext".to_string()
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            directory: default_migrations_directory(),
            context_type: default_context_type(),
        }
    }
}

/// Version store locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON ledger used by the file store
    #[serde(default = "default_ledger")]
    pub ledger: String,
    /// Version table read by `sqlite::runner_with_config`
    #[serde(default = "default_table")]
    pub table: String,
}

pub fn default_ledger() -> String {
    ".stepwise/versions.json".to_string()
}

pub fn default_table() -> String {
    "schema_migrations".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ledger: default_ledger(),
            table: default_table(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `stepwise=debug`. `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

pub fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
