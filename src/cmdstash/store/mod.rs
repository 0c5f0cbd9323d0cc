//! # Storage Layer
//!
//! [`Store`] owns the SQLite connection to the catalog's backing file. It
//! is opened once per process, guarantees the schema exists before first
//! use (create-if-absent, never destructive), and seeds the default
//! categories on an empty catalog.
//!
//! Each public mutation in the catalog layer is a single statement and
//! therefore atomic in isolation; no long-lived transactions are held.
//! The connection is closed when the `Store` is dropped, on normal and
//! abnormal exit paths alike.
//!
//! Construct with [`Store::open`] for the on-disk catalog or
//! [`Store::open_in_memory`] for isolated instances in tests.

use crate::error::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::fs;
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT UNIQUE NOT NULL,
        description TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS commands (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        command     TEXT NOT NULL,
        category_id INTEGER REFERENCES categories (id),
        description TEXT,
        is_favorite INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS notes (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        title      TEXT NOT NULL,
        content    TEXT,
        category   TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Categories present in every fresh catalog. Insertion is idempotent;
/// renaming or deleting them later is allowed like any other category.
const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("system", "System administration commands"),
    ("network", "Network diagnostics and configuration"),
    ("development", "Development and build tooling"),
    ("database", "Database operations"),
    ("other", "Everything else"),
];

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the catalog database at the given path,
    /// creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Opens a private in-memory catalog with the same schema and seed
    /// data. Used by tests and anywhere an isolated instance is needed.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        let store = Self { conn };
        store.seed_default_categories()?;
        Ok(store)
    }

    fn seed_default_categories(&self) -> Result<()> {
        let now = Utc::now();
        for (name, description) in DEFAULT_CATEGORIES {
            self.execute(
                "INSERT OR IGNORE INTO categories (name, description, created_at)
                 VALUES (?1, ?2, ?3)",
                (name, description, now),
            )?;
        }
        Ok(())
    }

    /// Executes a single mutating statement, returning the affected row
    /// count. Constraint and I/O failures surface as typed errors.
    pub fn execute(&self, sql: &str, params: impl Params) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Runs a read query and maps every row.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Runs a read query expected to produce at most one row.
    pub fn query_optional<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        Ok(self.conn.query_row(sql, params, map).optional()?)
    }

    /// Identifier of the most recently inserted row.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_in_memory_creates_schema() {
        let store = Store::open_in_memory().unwrap();
        for table in ["categories", "commands", "notes"] {
            let found = store
                .query_optional(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |_| Ok(true),
                )
                .unwrap();
            assert_eq!(found, Some(true), "missing table {}", table);
        }
    }

    #[test]
    fn seeds_exactly_five_default_categories() {
        let store = Store::open_in_memory().unwrap();
        let count: i64 = store
            .query_optional("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap()
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn reopening_does_not_duplicate_seed_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash.db");

        drop(Store::open(&path).unwrap());
        let store = Store::open(&path).unwrap();

        let count: i64 = store
            .query_optional("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap()
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("stash.db");

        let _store = Store::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn reopening_preserves_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash.db");

        {
            let store = Store::open(&path).unwrap();
            store
                .execute(
                    "INSERT INTO notes (title, content, category, created_at, updated_at)
                     VALUES ('t', 'c', NULL, ?1, ?1)",
                    [Utc::now()],
                )
                .unwrap();
        }

        let store = Store::open(&path).unwrap();
        let count: i64 = store
            .query_optional("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap()
            .unwrap();
        assert_eq!(count, 1);
    }
}
