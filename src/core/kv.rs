//! A tiny key-value store used to persist small records like the
//! session settings.
use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// Stores values in the `kv` table. Expects `initialize_db` to have
/// been run against the connection.
#[derive(Clone)]
pub struct SqliteKvStore {
    db: Connection,
}

impl SqliteKvStore {
    pub fn new(db: &Connection) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let k = key.to_owned();
        let value = self
            .db
            .call(move |conn| {
                let value = conn
                    .query_row("SELECT value FROM kv WHERE key = ?", [k], |row| row.get(0))
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let k = key.to_owned();
        let v = value.to_owned();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
                    [k, v],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

/// Keeps everything in memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
