//! SQLite backend: version table plus per-migration transactions.
//!
//! The version store and the migration context share one connection, so
//! the version insert/delete happens inside the transaction opened by the
//! `before` hook and commits or rolls back together with the migration.
//!
//! ```no_run
//! use rusqlite::Connection;
//! use stepwise::store::sqlite::{self, SqliteContext};
//! use stepwise::{Migration, Registry};
//!
//! let conn = Connection::open("app.db")?;
//! let mut registry = Registry::new();
//! registry.add(
//!     Migration::<SqliteContext>::new("20250119_100000")
//!         .up(|ctx| {
//!             ctx.connection()
//!                 .execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
//!             Ok(())
//!         })
//!         .down(|ctx| {
//!             ctx.connection().execute_batch("DROP TABLE users")?;
//!             Ok(())
//!         }),
//! );
//!
//! let mut ctx = SqliteContext::new(&conn);
//! sqlite::runner(&mut registry, &mut ctx).run()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rusqlite::{params, Connection, OptionalExtension};

use super::{is_identifier, VersionStore};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::hooks::Hooks;
use crate::registry::Registry;
use crate::runner::Runner;

/// Default name of the version table.
pub const DEFAULT_TABLE: &str = "schema_migrations";

/// Version store backed by a table in a SQLite database.
#[derive(Debug)]
pub struct SqliteVersionStore<'c> {
    conn: &'c Connection,
    table: String,
}

impl<'c> SqliteVersionStore<'c> {
    /// Store using the default `schema_migrations` table.
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Store using a custom table name. The name must be a plain identifier.
    pub fn with_table(conn: &'c Connection, table: &str) -> Result<Self, StoreError> {
        if !is_identifier(table) {
            return Err(StoreError::InvalidTable(table.to_string()));
        }
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Store using `[store].table` from the config.
    pub fn from_config(conn: &'c Connection, config: &StoreConfig) -> Result<Self, StoreError> {
        Self::with_table(conn, &config.table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl VersionStore for SqliteVersionStore<'_> {
    fn setup(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    \
                version TEXT NOT NULL PRIMARY KEY,\n    \
                applied_at TEXT NOT NULL\n\
            );",
            self.table
        ))?;
        Ok(())
    }

    fn has_version(&self, version: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE version = ?1", self.table),
                params![version],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn add_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (version, applied_at) VALUES (?1, ?2)",
                self.table
            ),
            params![version, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.conn.execute(
            &format!("DELETE FROM {} WHERE version = ?1", self.table),
            params![version],
        )?;
        Ok(())
    }

    fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT version FROM {} ORDER BY version", self.table))?;
        let versions = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, rusqlite::Error>>()?;
        Ok(versions)
    }
}

/// Context handed to SQLite migrations.
#[derive(Debug)]
pub struct SqliteContext<'c> {
    conn: &'c Connection,
    in_transaction: bool,
}

impl<'c> SqliteContext<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            in_transaction: false,
        }
    }

    pub fn connection(&self) -> &'c Connection {
        self.conn
    }

    /// True between the `before` hook and the matching commit/rollback.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

/// Hooks giving every migration step its own transaction.
///
/// - `before`: `BEGIN`
/// - `after`: `COMMIT` (rolled back if the commit itself fails)
/// - `on_error`: `ROLLBACK`, then let the original error through
pub fn transaction_hooks<'c>() -> Hooks<SqliteContext<'c>> {
    Hooks::none()
        .before(|ctx: &mut SqliteContext<'c>| {
            ctx.conn.execute_batch("BEGIN")?;
            ctx.in_transaction = true;
            Ok(())
        })
        .after(|ctx: &mut SqliteContext<'c>| {
            if !ctx.in_transaction {
                return Ok(());
            }
            ctx.in_transaction = false;
            if let Err(e) = ctx.conn.execute_batch("COMMIT") {
                let _ = ctx.conn.execute_batch("ROLLBACK");
                return Err(e.into());
            }
            Ok(())
        })
        .on_error(|ctx: &mut SqliteContext<'c>, err| {
            if ctx.in_transaction {
                ctx.in_transaction = false;
                tracing::debug!("Rolling back transaction after: {}", err);
                ctx.conn.execute_batch("ROLLBACK")?;
            }
            Ok(())
        })
}

/// Runner over `ctx`'s connection with the default version table and
/// [`transaction_hooks`].
pub fn runner<'r, 'c>(
    registry: &'r mut Registry<SqliteContext<'c>>,
    ctx: &'r mut SqliteContext<'c>,
) -> Runner<'r, SqliteContext<'c>, SqliteVersionStore<'c>> {
    let store = SqliteVersionStore::new(ctx.connection());
    Runner::new(registry, store, ctx).with_hooks(transaction_hooks())
}

/// [`runner`] with the version table taken from `[store].table`.
pub fn runner_with_config<'r, 'c>(
    registry: &'r mut Registry<SqliteContext<'c>>,
    ctx: &'r mut SqliteContext<'c>,
    config: &StoreConfig,
) -> Result<Runner<'r, SqliteContext<'c>, SqliteVersionStore<'c>>, StoreError> {
    let store = SqliteVersionStore::from_config(ctx.connection(), config)?;
    Ok(Runner::new(registry, store, ctx).with_hooks(transaction_hooks()))
}
