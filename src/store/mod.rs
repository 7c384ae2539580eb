//! SQLite-backed match store.
//!
//! A [`Store`] is built once from a [`StoreConfig`] and passed to every
//! operation. Operations open their own connection and close it when they
//! return. Loads are serialized by the store's write lock; readers run in WAL
//! mode and always see a committed generation.

pub mod loader;
pub mod query;

use crate::error::Result;
use crate::schema::{COLUMNS, FILTERABLE};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub use loader::{load, LoadMode};
pub use query::{get_match, list_matches, scan_matches};

/// Table holding match records
pub const TABLE: &str = "games";

/// Database file used when none is configured
pub const DEFAULT_DB_PATH: &str = "./tennisdata_app.db";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_DB_PATH)
    }
}

/// Handle to the match database
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    write_lock: Mutex<()>,
}

impl Store {
    /// Open the database, creating the table and indexes if needed
    pub fn open(config: StoreConfig) -> Result<Self> {
        let store = Store {
            config,
            write_lock: Mutex::new(()),
        };
        let conn = store.connect()?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::debug!("journal mode: {}", mode);
        conn.execute_batch(&schema_sql())?;
        log::debug!("opened match store at {}", store.path().display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// A fresh connection; closed when dropped
    pub(crate) fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.config.path)?;
        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;
        Ok(conn)
    }

    pub(crate) fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }

    /// Number of replace loads applied so far
    pub fn generation(&self) -> Result<i64> {
        let conn = self.connect()?;
        let generation = conn
            .query_row("SELECT generation FROM store_meta WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(generation.unwrap_or(0))
    }

    /// Number of stored matches
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", TABLE), [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Column list for the match table, key first
pub(crate) fn column_names() -> Vec<&'static str> {
    std::iter::once("id")
        .chain(COLUMNS.iter().map(|c| c.internal))
        .collect()
}

fn schema_sql() -> String {
    let mut columns = vec!["id TEXT PRIMARY KEY NOT NULL".to_string()];
    columns.extend(
        COLUMNS
            .iter()
            .map(|c| format!("{} {}", c.internal, c.kind.sql_type())),
    );

    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n);\n",
        TABLE,
        columns.join(",\n  ")
    );
    for column in FILTERABLE {
        sql.push_str(&format!(
            "CREATE INDEX IF NOT EXISTS ix_{table}_{col} ON {table} ({col});\n",
            table = TABLE,
            col = column
        ));
    }
    sql.push_str(
        "CREATE TABLE IF NOT EXISTS store_meta (\n  \
           id INTEGER PRIMARY KEY CHECK (id = 1),\n  \
           generation INTEGER NOT NULL\n\
         );\n\
         INSERT OR IGNORE INTO store_meta (id, generation) VALUES (1, 0);\n",
    );
    sql
}
