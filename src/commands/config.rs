//! Config subcommands handler

use anyhow::{Context, Result};
use std::path::Path;

use stepwise::Config;

/// Show the effective configuration as TOML.
pub fn handle_show(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    print!("{}", toml_str);
    Ok(())
}

/// Write a default config file unless one exists.
pub fn handle_init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    Config::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
