use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::error;
use rusqlite::{Connection, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tauri::{AppHandle, Manager};

/// A record type persisted as a JSON array under a fixed store key.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const STORE_KEY: &'static str;
    fn id(&self) -> &str;
}

/// Durable key-value store: one row per entity collection, the value being
/// the JSON-serialized array of records. Collections are always read and
/// written wholesale; there are no delta writes and no transactions across
/// keys. Single-process use only.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn new(app_handle: &AppHandle) -> Result<Self> {
        let app_dir = app_handle
            .path()
            .app_data_dir()
            .expect("failed to get app data dir");

        std::fs::create_dir_all(&app_dir).expect("failed to create app data directory");

        let db_path: PathBuf = app_dir.join("salon_desk.db");
        Self::open(&db_path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        Ok(Store {
            conn: Mutex::new(conn),
        })
    }

    /// Returns the stored collection for `T`, or an empty list when the key
    /// is absent or the stored value does not parse. Parse failures are
    /// swallowed by contract; callers never see them as errors.
    pub fn get<T: Entity>(&self) -> Vec<T> {
        let Ok(conn) = self.conn.lock() else {
            return Vec::new();
        };

        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM store WHERE key = ?1",
                [T::STORE_KEY],
                |row| row.get(0),
            )
            .ok();

        match raw {
            Some(json) => serde_json::from_str(&json).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Overwrites the stored collection for `T`. Serialization or write
    /// failures are logged and swallowed; the operation is a no-op from the
    /// caller's perspective.
    pub fn set<T: Entity>(&self, records: &[T]) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                error!("failed to serialize {}: {}", T::STORE_KEY, e);
                return;
            }
        };

        let Ok(conn) = self.conn.lock() else {
            error!("store lock poisoned, dropping write to {}", T::STORE_KEY);
            return;
        };

        if let Err(e) = conn.execute(
            "INSERT INTO store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![T::STORE_KEY, json],
        ) {
            error!("failed to persist {}: {}", T::STORE_KEY, e);
        }
    }

    /// True when no collection has ever been written for `T`.
    pub fn is_unset<T: Entity>(&self) -> bool {
        let Ok(conn) = self.conn.lock() else {
            return false;
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM store WHERE key = ?1",
                [T::STORE_KEY],
                |row| row.get(0),
            )
            .unwrap_or(0);

        count == 0
    }
}
