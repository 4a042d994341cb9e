//! Database connection management

use crate::error::Result;
use crate::store::LibSqlSettingsStore;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::{Path, PathBuf};

use super::migrations;

/// Database wrapper for libSQL connections
pub struct Database {
    // Keeps the database handle alive for the connection's lifetime.
    _db: LibSqlDatabase,
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a local database at the given path, creating it (and its parent
    /// directory) if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let path_str = path.to_string_lossy().to_string();
        let db = Builder::new_local(&path_str).build().await?;
        let conn = db.connect()?;

        let database = Self {
            _db: db,
            conn,
            path: Some(path.to_path_buf()),
        };
        database.configure().await?;
        database.migrate().await?;
        tracing::debug!("Opened preferences database at {}", path.display());
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        let database = Self {
            _db: db,
            conn,
            path: None,
        };
        database.configure().await?;
        database.migrate().await?;
        Ok(database)
    }

    /// Configure `SQLite` for a small, frequently rewritten table
    async fn configure(&self) -> Result<()> {
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok(); // Not supported for in-memory databases
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        Ok(())
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn).await
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// File backing this database, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Settings store sharing this database's connection
    pub fn settings_store(&self) -> LibSqlSettingsStore {
        LibSqlSettingsStore::new(self.conn.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.path().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_creates_parent_directory() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("prefs.db");

        let db = Database::open(&db_path).await.unwrap();
        assert_eq!(db.path(), Some(db_path.as_path()));
        assert!(db_path.exists());

        let mut rows = db
            .connection()
            .query("SELECT COUNT(*) FROM preferences", ())
            .await
            .expect("preferences table should exist");
        let row = rows.next().await.unwrap().unwrap();
        let count: i64 = row.get(0).unwrap();
        assert_eq!(count, 0);
    }
}
