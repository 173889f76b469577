//! Migration source scaffolding (`new <name>`).
//!
//! Each migration lives in its own module file named
//! `m<YYYYMMDD_HHMMSS>_<slug>.rs`. After every new file the directory's
//! `mod.rs` is regenerated so that `registry()` lists all migrations.

pub mod templates;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::files::atomic_write;
use crate::files::slug::slugify;

/// Length of a `YYYYMMDD_HHMMSS` version.
pub const VERSION_LENGTH: usize = 15;

/// Generates migration versions.
pub type VersionFn = Box<dyn Fn() -> String>;

/// A migration module found in (or written to) the migrations directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedMigration {
    pub version: String,
    pub slug: String,
    /// Module name, `m<version>_<slug>`.
    pub module: String,
    pub path: PathBuf,
}

/// Writes migration modules into a directory.
pub struct Scaffolder {
    dir: PathBuf,
    context_type: String,
    new_version: VersionFn,
}

impl std::fmt::Debug for Scaffolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scaffolder")
            .field("dir", &self.dir)
            .field("context_type", &self.context_type)
            .finish()
    }
}

impl Scaffolder {
    /// Scaffolder for `dir` using UTC timestamps as versions.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            context_type: crate::config::default_context_type(),
            new_version: Box::new(timestamp_version),
        }
    }

    /// Scaffolder for the configured directory and context type.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.migrations_directory())
            .with_context_type(config.migrations.context_type.clone())
    }

    /// Rust path re-exported as `Context` by the generated `mod.rs`.
    pub fn with_context_type(mut self, context_type: impl Into<String>) -> Self {
        self.context_type = context_type.into();
        self
    }

    /// Replace the version generator. Generated versions must still have
    /// the `YYYYMMDD_HHMMSS` shape.
    pub fn with_version_generator<F>(mut self, f: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        self.new_version = Box::new(f);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a new migration module for `name` and regenerate `mod.rs`.
    pub fn create(&self, name: &str) -> Result<ScaffoldedMigration> {
        let version = (self.new_version)();
        if !is_valid_version(&version) {
            bail!(
                "Generated version {:?} is not of the form YYYYMMDD_HHMMSS",
                version
            );
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create migrations directory: {:?}", self.dir))?;

        if let Some(existing) = self.list()?.into_iter().find(|m| m.version == version) {
            bail!(
                "Migration version {} already exists: {}",
                version,
                existing.path.display()
            );
        }

        let slug = slugify(name);
        let module = format!("m{}_{}", version, slug);
        let path = self.dir.join(format!("{}.rs", module));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create migration file: {:?}", path))?;
        file.write_all(templates::render_migration(&version, name.trim()).as_bytes())
            .with_context(|| format!("Failed to write migration file: {:?}", path))?;

        self.write_mod_file()?;
        tracing::info!("Created migration {}", path.display());

        Ok(ScaffoldedMigration {
            version,
            slug,
            module,
            path,
        })
    }

    /// Migration modules in the directory, sorted by version.
    ///
    /// A missing directory has no migrations. Files that do not follow the
    /// naming scheme are ignored.
    pub fn list(&self) -> Result<Vec<ScaffoldedMigration>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read migrations directory: {:?}", self.dir))?;

        let mut migrations = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some((version, slug)) = parse_module_name(stem) {
                migrations.push(ScaffoldedMigration {
                    module: stem.to_string(),
                    version,
                    slug,
                    path,
                });
            }
        }

        migrations.sort_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then_with(|| a.module.cmp(&b.module))
        });
        Ok(migrations)
    }

    /// Rewrite `mod.rs` from the current directory listing.
    pub fn write_mod_file(&self) -> Result<PathBuf> {
        let modules: Vec<String> = self.list()?.into_iter().map(|m| m.module).collect();
        let path = self.dir.join("mod.rs");
        let contents = templates::render_mod_file(&self.context_type, &modules);
        atomic_write(&path, &contents)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Wrote {} ({} migrations)", path.display(), modules.len());
        Ok(path)
    }
}

/// Current UTC time as `YYYYMMDD_HHMMSS`.
pub fn timestamp_version() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// True for `YYYYMMDD_HHMMSS` (digits only, underscore at position 8).
pub fn is_valid_version(version: &str) -> bool {
    version.len() == VERSION_LENGTH
        && version.bytes().enumerate().all(|(i, b)| {
            if i == 8 {
                b == b'_'
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Split `m<version>_<slug>` into version and slug.
pub fn parse_module_name(stem: &str) -> Option<(String, String)> {
    let rest = stem.strip_prefix('m')?;
    let version = rest.get(..VERSION_LENGTH)?;
    if !is_valid_version(version) {
        return None;
    }
    let slug = rest[VERSION_LENGTH..].strip_prefix('_')?;
    if slug.is_empty() {
        return None;
    }
    Some((version.to_string(), slug.to_string()))
}
