use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use stepwise::scaffold::{parse_module_name, Scaffolder};
use stepwise::Config;
use tempfile::TempDir;

/// Generator handing out consecutive seconds.
fn sequence(start: u32) -> impl Fn() -> String {
    let next = Rc::new(Cell::new(start));
    move || {
        let n = next.get();
        next.set(n + 1);
        format!("20250119_{:06}", n)
    }
}

#[test]
fn mod_rs_registers_every_migration_in_order() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path())
        .with_context_type("crate::db::Context")
        .with_version_generator(sequence(100000));

    scaffolder.create("create users").unwrap();
    scaffolder.create("add email index").unwrap();

    let mod_rs = fs::read_to_string(dir.path().join("mod.rs")).unwrap();
    let first = mod_rs
        .find("registry.add(m20250119_100000_create_users::migration());")
        .unwrap();
    let second = mod_rs
        .find("registry.add(m20250119_100001_add_email_index::migration());")
        .unwrap();
    assert!(first < second);
    assert!(mod_rs.contains("pub use crate::db::Context as Context;"));
    assert!(mod_rs.contains("pub fn registry() -> Registry<Context> {"));
}

#[test]
fn names_are_transliterated() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path()).with_version_generator(sequence(0));

    let created = scaffolder.create("Créer la table « café »").unwrap();
    assert_eq!(created.slug, "creer_la_table_cafe");

    let created = scaffolder.create("   ").unwrap();
    assert_eq!(created.slug, "migration");
}

#[test]
fn generated_file_contains_version_and_name() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path())
        .with_version_generator(|| "20250119_100000".to_string());

    let created = scaffolder.create("create users").unwrap();
    let source = fs::read_to_string(&created.path).unwrap();

    assert!(source.starts_with("//! Migration 20250119_100000: create users"));
    assert!(source.contains("Migration::<Context>::new(\"20250119_100000\")"));
    assert!(source.contains("use super::Context;"));
}

#[test]
fn list_ignores_unrelated_files() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path()).with_version_generator(sequence(5));
    scaffolder.create("one").unwrap();
    fs::write(dir.path().join("helpers.rs"), "").unwrap();
    fs::write(dir.path().join("m20250119_000009_notes.txt"), "").unwrap();
    fs::write(dir.path().join("README.md"), "").unwrap();

    let listed = scaffolder.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].module, "m20250119_000005_one");

    // Regenerating keeps unrelated files out of mod.rs
    scaffolder.write_mod_file().unwrap();
    let mod_rs = fs::read_to_string(dir.path().join("mod.rs")).unwrap();
    assert!(!mod_rs.contains("helpers"));
}

#[test]
fn existing_file_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m20250119_100000_keep.rs");
    fs::write(&path, "// hand written").unwrap();
    let scaffolder = Scaffolder::new(dir.path())
        .with_version_generator(|| "20250119_100000".to_string());

    assert!(scaffolder.create("keep").is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "// hand written");
}

#[test]
fn from_config_uses_configured_directory() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::load_from(&dir.path().join("stepwise.toml")).unwrap();
    config.migrations.directory = "db/migrations".to_string();

    let scaffolder = Scaffolder::from_config(&config);
    assert_eq!(scaffolder.dir(), dir.path().join("db").join("migrations"));
}

#[test]
fn module_names_round_trip_through_parser() {
    let dir = TempDir::new().unwrap();
    let scaffolder = Scaffolder::new(dir.path()).with_version_generator(sequence(42));
    let created = scaffolder.create("add_index").unwrap();
    assert_eq!(
        parse_module_name(&created.module),
        Some((created.version.clone(), created.slug.clone()))
    );
}

#[test]
fn multi_line_name_is_flattened_into_the_header() {
    let dir = TempDir::new().unwrap();
    let scaffolder =
        Scaffolder::new(dir.path()).with_version_generator(|| "20250119_100000".to_string());

    let created = scaffolder
        .create("add users\npub fn injected() {}")
        .unwrap();

    let src = fs::read_to_string(&created.path).unwrap();
    let mut lines = src.lines();
    assert_eq!(
        lines.next(),
        Some("//! Migration 20250119_100000: add users pub fn injected() {}")
    );
    assert!(lines.all(|line| !line.contains("injected")));
}

#[test]
fn keyword_name_gets_prefixed_module() {
    let dir = TempDir::new().unwrap();
    let scaffolder =
        Scaffolder::new(dir.path()).with_version_generator(|| "20250119_100000".to_string());

    let created = scaffolder.create("type").unwrap();

    assert_eq!(created.slug, "type");
    assert_eq!(created.module, "m20250119_100000_type");
    let mod_rs = fs::read_to_string(dir.path().join("mod.rs")).unwrap();
    assert!(mod_rs.contains("mod m20250119_100000_type;"));
}
