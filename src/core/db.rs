use std::path::Path;

use anyhow::{Error, Result};
use rusqlite::Connection as SyncConnection;
use tokio_rusqlite::Connection;

const DB_FILE_NAME: &str = "chatroom.sqlite3";

/// Opens the SQLite database stored in the `db_path` directory.
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    let path = Path::new(db_path).join(DB_FILE_NAME);
    let db = Connection::open(path).await?;
    Ok(db)
}

/// Creates every table the app needs. Safe to run more than once.
pub fn initialize_db(conn: &mut SyncConnection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_db_is_idempotent() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db = async_db(temp_dir.path().to_str().unwrap()).await?;

        let tables = db
            .call(|conn| {
                initialize_db(conn)?;
                initialize_db(conn)?;
                let count: i64 = conn.query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='kv'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;

        assert_eq!(tables, 1);
        assert!(temp_dir.path().join(DB_FILE_NAME).exists());
        Ok(())
    }
}
