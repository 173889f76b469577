//! Tests for the stepwise binary.

use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::stepwise;

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    stepwise(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn new_creates_migration_and_mod_rs() {
    let dir = TempDir::new().unwrap();

    stepwise(dir.path())
        .args(["new", "create users"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating migration:"))
        .stdout(predicate::str::contains("_create_users.rs"));

    let migrations = dir.path().join("migrations");
    assert!(migrations.join("mod.rs").exists());
    let created: Vec<_> = fs::read_dir(&migrations)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with("_create_users.rs"))
        .collect();
    assert_eq!(created.len(), 1);
    assert!(created[0].starts_with('m'));
}

#[test]
fn new_honours_config_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("stepwise.toml"),
        "[migrations]\ndirectory = \"db/migrations\"\ncontext_type = \"crate::db::Ctx\"\n",
    )
    .unwrap();

    stepwise(dir.path()).args(["new", "init"]).assert().success();

    let mod_rs = fs::read_to_string(dir.path().join("db/migrations/mod.rs")).unwrap();
    assert!(mod_rs.contains("pub use crate::db::Ctx as Context;"));
}

#[test]
fn explicit_config_path_resolves_relative_to_its_directory() {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("app");
    fs::create_dir_all(&app).unwrap();
    fs::write(app.join("stepwise.toml"), "[migrations]\ndirectory = \"sql\"\n").unwrap();

    stepwise(dir.path())
        .args(["new", "first", "--config", "app/stepwise.toml"])
        .assert()
        .success();

    assert!(app.join("sql").join("mod.rs").exists());
}

#[test]
fn list_shows_ledger_state() {
    let dir = TempDir::new().unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(migrations.join("m20250101_000000_create_users.rs"), "").unwrap();
    fs::write(migrations.join("m20250102_000000_add_posts.rs"), "").unwrap();
    fs::create_dir_all(dir.path().join(".stepwise")).unwrap();
    fs::write(
        dir.path().join(".stepwise/versions.json"),
        r#"{"applied":[{"version":"20250101_000000","applied_at":"2025-01-01T00:00:00+00:00"}]}"#,
    )
    .unwrap();

    stepwise(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "applied  20250101_000000  create_users",
        ))
        .stdout(predicate::str::contains("pending  20250102_000000  add_posts"));
}

#[test]
fn list_without_migrations() {
    let dir = TempDir::new().unwrap();
    stepwise(dir.path())
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("No migrations in"));
}

#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();

    stepwise(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    assert!(dir.path().join("stepwise.toml").exists());

    stepwise(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    stepwise(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[migrations]"))
        .stdout(predicate::str::contains("table = \"schema_migrations\""));
}

#[test]
fn invalid_config_fails_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stepwise.toml"), "[store]\ntable = \"a b\"\n").unwrap();

    stepwise(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();
    stepwise(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stepwise"));
}
