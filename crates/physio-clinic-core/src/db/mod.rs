//! Persistence layer: a SQLite-backed key-value store holding the clinic
//! snapshot, its single-slot auto-backup and host preferences.

mod migrate;
mod schema;
mod snapshot;

pub use migrate::*;
pub use schema::*;
pub use snapshot::*;

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Key of the primary snapshot.
pub const SNAPSHOT_KEY: &str = "phizio-db-v1";

/// Key of the auto-backup envelope (`{timestamp, data}`).
pub const AUTO_BACKUP_KEY: &str = "phizio-auto-backup";

/// Auxiliary key remembering where the last backup was exported.
pub const LAST_EXPORT_KEY: &str = "backup.lastHandle";

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The two independent keyspaces of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyspace {
    /// Snapshot and auto-backup
    Local,
    /// Host preferences such as the last export location
    Aux,
}

impl Keyspace {
    fn table(self) -> &'static str {
        match self {
            Keyspace::Local => "local_storage",
            Keyspace::Aux => "aux_storage",
        }
    }
}

/// Key-value store connection wrapper.
pub struct Store {
    conn: Connection,
    /// SHA-256 of the snapshot this store last read or wrote
    fingerprint: Option<String>,
}

impl Store {
    /// Open store at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            fingerprint: None,
        })
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn get(&self, space: Keyspace, key: &str) -> StoreResult<Option<String>> {
        get_value(&self.conn, space, key)
    }

    pub fn set(&self, space: Keyspace, key: &str, value: &str) -> StoreResult<()> {
        put_value(&self.conn, space, key, value)
    }

    /// Delete a key. Returns `false` if it was absent.
    pub fn remove(&self, space: Keyspace, key: &str) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            &format!("DELETE FROM {} WHERE key = ?", space.table()),
            [key],
        )?;
        Ok(rows_affected > 0)
    }
}

fn get_value(conn: &Connection, space: Keyspace, key: &str) -> StoreResult<Option<String>> {
    conn.query_row(
        &format!("SELECT value FROM {} WHERE key = ?", space.table()),
        [key],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

fn put_value(conn: &Connection, space: Keyspace, key: &str, value: &str) -> StoreResult<()> {
    conn.execute(
        &format!(
            r#"
            INSERT INTO {} (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            space.table()
        ),
        params![key, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let store = Store::open_in_memory().unwrap();

        let tables: Vec<String> = store
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"local_storage".to_string()));
        assert!(tables.contains(&"aux_storage".to_string()));
    }

    #[test]
    fn test_set_get_overwrite_remove() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get(Keyspace::Local, "k").unwrap(), None);

        store.set(Keyspace::Local, "k", "one").unwrap();
        store.set(Keyspace::Local, "k", "two").unwrap();
        assert_eq!(store.get(Keyspace::Local, "k").unwrap().as_deref(), Some("two"));

        assert!(store.remove(Keyspace::Local, "k").unwrap());
        assert!(!store.remove(Keyspace::Local, "k").unwrap());
    }

    #[test]
    fn test_keyspaces_are_independent() {
        let store = Store::open_in_memory().unwrap();
        store.set(Keyspace::Aux, LAST_EXPORT_KEY, "/tmp/backup.json").unwrap();
        assert_eq!(store.get(Keyspace::Local, LAST_EXPORT_KEY).unwrap(), None);
        assert_eq!(
            store.get(Keyspace::Aux, LAST_EXPORT_KEY).unwrap().as_deref(),
            Some("/tmp/backup.json")
        );
    }
}
