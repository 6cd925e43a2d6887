//! SQLite-backed key-value store.
//!
//! A single `kv` table holding the progress snapshot and the last user
//! details. Lives at `<data dir>/quizdeck.db`.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStore};
use crate::error::StoreError;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `<data dir>/quizdeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("quizdeck.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert!(store.get("test").unwrap().is_none());
        store.set("test", "hello").unwrap();
        assert_eq!(store.get("test").unwrap().unwrap(), "hello");
        store.set("test", "again").unwrap();
        assert_eq!(store.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.set("quizProgress", "{}").unwrap();
        store.remove("quizProgress").unwrap();
        store.remove("quizProgress").unwrap();
        assert!(store.get("quizProgress").unwrap().is_none());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdeck.db");
        {
            let mut store = SqliteStore::open_at(&path).unwrap();
            store.set("quizUserName", "Ada").unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(store.get("quizUserName").unwrap().as_deref(), Some("Ada"));
    }
}
