//! Test helper utilities

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

/// `stepwise` binary running inside `dir` with logging quiet and colors off.
pub fn stepwise(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stepwise").expect("stepwise binary not built");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Context for file-store runs: a plain list of created "tables".
#[derive(Debug, Default)]
pub struct Schema {
    pub tables: Vec<String>,
}

pub fn create_table(version: &str, table: &'static str) -> stepwise::Migration<Schema> {
    stepwise::Migration::<Schema>::new(version)
        .up(move |schema| {
            schema.tables.push(table.to_string());
            Ok(())
        })
        .down(move |schema| {
            schema.tables.retain(|t| t != table);
            Ok(())
        })
}
