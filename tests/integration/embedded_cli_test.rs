//! Migration commands mounted in an application's own CLI.

use clap::Parser;
use stepwise::cli::{execute_to, MigrationCommand};
use stepwise::{MemoryVersionStore, Registry, Runner, Scaffolder};
use tempfile::TempDir;

use super::helpers::{create_table, Schema};

#[derive(Parser)]
#[command(name = "app")]
struct AppCli {
    #[command(subcommand)]
    migration: MigrationCommand,
}

fn output_of(
    args: &[&str],
    runner: &mut Runner<'_, Schema, MemoryVersionStore>,
    scaffolder: &Scaffolder,
) -> anyhow::Result<String> {
    let cli = AppCli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute_to(&cli.migration, runner, scaffolder, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn run_status_and_rollback_through_commands() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path());
    let mut registry = Registry::new()
        .with(create_table("20250101_000000", "users"))
        .with(create_table("20250102_000000", "posts"));
    let mut schema = Schema::default();
    let mut runner = Runner::new(&mut registry, MemoryVersionStore::new(), &mut schema);

    let out = output_of(&["app", "status"], &mut runner, &scaffolder).unwrap();
    assert_eq!(out, "pending  20250101_000000\npending  20250102_000000\n");

    let out = output_of(&["app", "run"], &mut runner, &scaffolder).unwrap();
    assert_eq!(out, "Applied 20250101_000000\nApplied 20250102_000000\n");

    let out = output_of(&["app", "run"], &mut runner, &scaffolder).unwrap();
    assert_eq!(out, "Nothing to migrate.\n");

    let out = output_of(&["app", "rollback"], &mut runner, &scaffolder).unwrap();
    assert_eq!(out, "Rolled back 20250102_000000\n");

    let out = output_of(&["app", "status"], &mut runner, &scaffolder).unwrap();
    assert_eq!(out, "applied  20250101_000000\npending  20250102_000000\n");
    drop(runner);

    assert_eq!(schema.tables, vec!["users"]);
}

#[test]
fn new_command_uses_scaffolder() {
    let dir = TempDir::new().unwrap();
    let scaffolder =
        Scaffolder::new(dir.path()).with_version_generator(|| "20250119_100000".to_string());
    let mut registry: Registry<Schema> = Registry::new();
    let mut schema = Schema::default();
    let mut runner = Runner::new(&mut registry, MemoryVersionStore::new(), &mut schema);

    let out = output_of(&["app", "new", "add index"], &mut runner, &scaffolder).unwrap();

    assert!(out.starts_with("Created migration: "));
    assert!(dir.path().join("m20250119_100000_add_index.rs").exists());
}

#[test]
fn failing_run_surfaces_error_with_context() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path());
    let mut registry = Registry::new().with(
        stepwise::Migration::<Schema>::new("20250101_000000")
            .up(|_| Err(anyhow::anyhow!("Oh no"))),
    );
    let mut schema = Schema::default();
    let mut runner = Runner::new(&mut registry, MemoryVersionStore::new(), &mut schema);

    let err = output_of(&["app", "run"], &mut runner, &scaffolder).unwrap_err();

    assert_eq!(err.to_string(), "Migration run failed");
    assert!(format!("{:#}", err).contains("Oh no"));
}

#[test]
fn empty_registry_status() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path());
    let mut registry: Registry<Schema> = Registry::new();
    let mut schema = Schema::default();
    let mut runner = Runner::new(&mut registry, MemoryVersionStore::new(), &mut schema);

    let out = output_of(&["app", "status"], &mut runner, &scaffolder).unwrap();
    assert_eq!(out, "No migrations registered.\n");
}
