//! List command handler

use std::collections::HashMap;

use anyhow::{Context, Result};

use stepwise::scaffold::ScaffoldedMigration;
use stepwise::store::AppliedVersion;
use stepwise::{Config, FileVersionStore, Scaffolder};

/// List scaffolded migrations with their state in the JSON ledger.
pub fn handle(config: &Config) -> Result<()> {
    let scaffolder = Scaffolder::from_config(config);
    let migrations = scaffolder.list()?;
    let ledger_path = config.ledger_path();
    let applied = FileVersionStore::read_ledger(&ledger_path)
        .with_context(|| format!("Failed to read ledger {:?}", ledger_path))?;

    if migrations.is_empty() {
        println!("No migrations in {}", scaffolder.dir().display());
        return Ok(());
    }

    for line in format_rows(&migrations, &applied) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per migration: state, version, slug, applied timestamp.
pub fn format_rows(migrations: &[ScaffoldedMigration], applied: &[AppliedVersion]) -> Vec<String> {
    let by_version: HashMap<&str, &str> = applied
        .iter()
        .map(|a| (a.version.as_str(), a.applied_at.as_str()))
        .collect();

    migrations
        .iter()
        .map(|m| match by_version.get(m.version.as_str()) {
            Some(at) => format!("applied  {}  {}  ({})", m.version, m.slug, at),
            None => format!("pending  {}  {}", m.version, m.slug),
        })
        .collect()
}
