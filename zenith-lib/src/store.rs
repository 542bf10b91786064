//src/store.rs
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DB_FILE_NAME: &str = "zenith.sqlite";
const APP_DATA_DIR: &str = "zenith";
const DATA_ENV_VAR: &str = "ZENITH_DATA_DIR";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection failed: {0}")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database query failed for key '{key}': {source}")]
    QueryFailed {
        key: String,
        source: rusqlite::Error,
    },
    #[error("Database write failed for key '{key}': {source}")]
    WriteFailed {
        key: String,
        source: rusqlite::Error,
    },
}

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreWrite {
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// String-keyed persistent store holding JSON-encoded values.
pub trait KeyValueStore {
    /// # Errors
    /// Returns `Error` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// # Errors
    /// Returns `Error` if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// # Errors
    /// Returns `Error` if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Error>;

    /// Applies several writes. The default applies them in order with no atomicity;
    /// a failure part-way leaves the earlier writes in place.
    /// # Errors
    /// Returns the first write error.
    fn apply(&self, writes: &[StoreWrite]) -> Result<(), Error> {
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => self.set(key, value)?,
                StoreWrite::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }

    /// Whether `apply` commits all writes or none.
    fn is_transactional(&self) -> bool {
        false
    }
}

/// SQLite-backed store: one `kv` table, one row per key.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `path`.
    /// # Errors
    /// Returns `Error` if the database cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// # Errors
    /// Returns `Error` if the in-memory database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, Error> {
        init(&conn)?;
        Ok(Self { conn })
    }

    /// Keys currently present, sorted.
    /// # Errors
    /// Returns `Error` if the query fails.
    pub fn keys(&self) -> Result<Vec<String>, Error> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key ASC")?;
        let keys = stmt.query_map([], |row| row.get(0))?;
        keys.collect::<Result<Vec<_>, _>>().map_err(Error::Connection)
    }
}

/// Initializes the key-value table if it doesn't exist.
fn init(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn write_one(conn: &Connection, write: &StoreWrite) -> Result<(), Error> {
    let result = match write {
        StoreWrite::Set { key, value } => conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        ),
        StoreWrite::Remove { key } => conn.execute("DELETE FROM kv WHERE key = ?1", params![key]),
    };
    result.map(|_| ()).map_err(|source| Error::WriteFailed {
        key: write.key().to_string(),
        source,
    })
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|source| Error::QueryFailed {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        write_one(
            &self.conn,
            &StoreWrite::Set {
                key: key.to_string(),
                value: value.to_string(),
            },
        )
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        write_one(
            &self.conn,
            &StoreWrite::Remove {
                key: key.to_string(),
            },
        )
    }

    fn apply(&self, writes: &[StoreWrite]) -> Result<(), Error> {
        // Rolled back on drop unless committed.
        let tx = self.conn.unchecked_transaction()?;
        for write in writes {
            write_one(&tx, write)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn is_transactional(&self) -> bool {
        true
    }
}

/// Process-local store, used in tests and for throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Gets the path to the SQLite database file within the app's data directory.
/// Exposed at crate root as `get_db_path_util`.
/// # Errors
/// Returns `Error` if the data directory cannot be determined or created.
pub fn get_db_path() -> Result<PathBuf, Error> {
    let app_dir = match std::env::var(DATA_ENV_VAR) {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => dirs::data_dir().ok_or(Error::DataDir)?.join(APP_DATA_DIR),
    };
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_store_round_trips_and_overwrites() -> Result<(), Error> {
        let store = SqliteStore::open_in_memory()?;
        assert_eq!(store.get("a")?, None);
        store.set("a", "1")?;
        store.set("a", "2")?;
        assert_eq!(store.get("a")?.as_deref(), Some("2"));
        store.remove("a")?;
        assert_eq!(store.get("a")?, None);
        Ok(())
    }

    #[test]
    fn sqlite_apply_writes_every_key() -> Result<(), Error> {
        let store = SqliteStore::open_in_memory()?;
        store.set("active", "{}")?;
        store.apply(&[
            StoreWrite::Set {
                key: "history".into(),
                value: "[]".into(),
            },
            StoreWrite::Remove {
                key: "active".into(),
            },
        ])?;
        assert_eq!(store.keys()?, vec!["history".to_string()]);
        assert!(store.is_transactional());
        Ok(())
    }
}
