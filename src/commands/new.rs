//! New command handler

use anyhow::Result;

use stepwise::{Config, Scaffolder};

/// Scaffold a migration in the configured directory.
pub fn handle(config: &Config, name: &str) -> Result<()> {
    let scaffolder = Scaffolder::from_config(config);
    let created = scaffolder.create(name)?;
    println!("Creating migration: {}", created.path.display());
    Ok(())
}
