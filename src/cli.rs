//! CLI definitions for stepwise
//!
//! Two surfaces live here:
//!
//! - [`Cli`] - the standalone `stepwise` binary (scaffolding, listing, config).
//!   Kept in the library so xtask can render man pages from it.
//! - [`MigrationCommand`] + [`execute`] - subcommands an application mounts in
//!   its own binary, bound to its own [`Runner`].

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use crate::runner::Runner;
use crate::scaffold::Scaffolder;
use crate::store::VersionStore;

/// Build clap styles.
///
/// - Green: headers, usage, command names
/// - White: placeholders and valid values (light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "[ stepwise ] - ordered, reversible schema migrations")]
#[command(
    long_about = "stepwise - scaffold and inspect ordered, reversible schema migrations.

Migrations are Rust modules named m<YYYYMMDD_HHMMSS>_<name>.rs inside the
migrations directory. Every `stepwise new` regenerates the directory's mod.rs
so that `registry()` returns all of them. Applying and rolling back happens
inside your application, through stepwise::Runner or the embeddable
stepwise::cli::MigrationCommand.

QUICK START:
    stepwise config init           Write a default stepwise.toml
    stepwise new create_users      Scaffold a migration
    stepwise list                  Show migrations and their applied state"
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Path to the config file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (default: ./stepwise.toml)"
    )]
    pub config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG and [logging].level
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        help = "Log filter, e.g. debug or stepwise=trace"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new migration
    #[command(long_about = "Create a new migration module in the migrations directory.

The file is named m<YYYYMMDD_HHMMSS>_<name>.rs using the current UTC time,
with the name transliterated to lower-case ASCII. Existing files are never
overwritten. mod.rs is regenerated afterwards.

EXAMPLES:
    stepwise new create_users
    stepwise new \"Add email index\"")]
    New {
        /// Human-readable migration name
        #[arg(help = "Migration name (becomes part of the file name)")]
        name: String,
    },

    /// List scaffolded migrations
    #[command(
        visible_alias = "ls",
        long_about = "List migrations found in the migrations directory, oldest first.

Each row shows whether the version is recorded in the JSON ledger
([store].ledger). Applications using a database-backed store should use
their own `migration status` command instead.

EXAMPLE:
    stepwise list"
    )]
    List,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Print a shell completion script to stdout.

EXAMPLES:
    stepwise completions bash > ~/.local/share/bash-completion/completions/stepwise
    stepwise completions zsh > ~/.zfunc/_stepwise")]
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    #[command(long_about = "Print the effective configuration (file values plus defaults) as TOML.

EXAMPLE:
    stepwise config show")]
    Show,
    /// Write a default config file
    #[command(long_about = "Write stepwise.toml with default values.

Does nothing if the file already exists.

EXAMPLE:
    stepwise config init")]
    Init,
}

/// Migration subcommands for an application's own binary.
///
/// ```ignore
/// #[derive(clap::Subcommand)]
/// enum AppCommands {
///     #[command(subcommand)]
///     Migration(stepwise::cli::MigrationCommand),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MigrationCommand {
    /// Create a migration
    New {
        #[arg(help = "Migration name")]
        name: String,
    },
    /// Run all pending migrations
    Run,
    /// Roll back the most recent migration
    Rollback,
    /// Show applied state of every migration
    Status,
}

/// Run `command` against `runner`, printing results to stdout.
#[cfg(not(tarpaulin_include))]
pub fn execute<C, S: VersionStore>(
    command: &MigrationCommand,
    runner: &mut Runner<'_, C, S>,
    scaffolder: &Scaffolder,
) -> Result<()> {
    execute_to(command, runner, scaffolder, &mut io::stdout())
}

/// [`execute`] writing to `out`.
pub fn execute_to<C, S: VersionStore, W: Write>(
    command: &MigrationCommand,
    runner: &mut Runner<'_, C, S>,
    scaffolder: &Scaffolder,
    out: &mut W,
) -> Result<()> {
    match command {
        MigrationCommand::New { name } => {
            let created = scaffolder.create(name)?;
            writeln!(out, "Created migration: {}", created.path.display())?;
        }
        MigrationCommand::Run => {
            let report = runner.run().context("Migration run failed")?;
            for version in &report.applied {
                writeln!(out, "Applied {}", version)?;
            }
            if report.is_noop() {
                writeln!(out, "Nothing to migrate.")?;
            }
        }
        MigrationCommand::Rollback => match runner.rollback().context("Rollback failed")? {
            Some(version) => writeln!(out, "Rolled back {}", version)?,
            None => writeln!(out, "Nothing to roll back.")?,
        },
        MigrationCommand::Status => {
            let statuses = runner.status().context("Failed to read migration status")?;
            if statuses.is_empty() {
                writeln!(out, "No migrations registered.")?;
            }
            for status in statuses {
                let mark = if status.applied { "applied" } else { "pending" };
                writeln!(out, "{:<8} {}", mark, status.version)?;
            }
        }
    }
    Ok(())
}
