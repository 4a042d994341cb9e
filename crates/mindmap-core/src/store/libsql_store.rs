//! libSQL-backed settings store

use libsql::{params, Connection};

use super::{SettingsStore, StoredEntry};
use crate::error::Result;
use crate::models::SettingValue;
use crate::util::unix_timestamp_millis_now;

/// Durable store over the `preferences` table.
///
/// Values are kept as JSON text; see [`SettingValue::to_json`].
#[derive(Clone)]
pub struct LibSqlSettingsStore {
    conn: Connection,
}

impl LibSqlSettingsStore {
    /// Create a new store with the given connection.
    ///
    /// The connection must point at a migrated database.
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl SettingsStore for LibSqlSettingsStore {
    async fn get(&self, group: &str, key: &str) -> Result<Option<SettingValue>> {
        let mut rows = self
            .conn
            .query(
                "SELECT value FROM preferences WHERE group_name = ? AND key = ?",
                [group, key],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            let raw: String = row.get(0)?;
            Ok(Some(SettingValue::from_json(&raw)?))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, group: &str, key: &str, value: SettingValue) -> Result<()> {
        let raw = value.to_json()?;
        self.conn
            .execute(
                "INSERT INTO preferences (group_name, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(group_name, key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![group, key, raw, unix_timestamp_millis_now()],
            )
            .await?;
        tracing::debug!(group, key, "Stored setting");
        Ok(())
    }

    async fn remove(&self, group: &str, key: &str) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM preferences WHERE group_name = ? AND key = ?",
                [group, key],
            )
            .await?;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT group_name, key, value FROM preferences ORDER BY group_name, key",
                (),
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            let group: String = row.get(0)?;
            let key: String = row.get(1)?;
            let raw: String = row.get(2)?;
            match SettingValue::from_json(&raw) {
                Ok(value) => entries.push(StoredEntry { group, key, value }),
                Err(error) => {
                    tracing::warn!(%group, %key, %error, "Skipping unreadable setting row");
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Size;
    use crate::store::SettingsStoreExt;
    use pretty_assertions::assert_eq;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_missing_returns_none() {
        let db = setup().await;
        let store = db.settings_store();

        assert_eq!(store.get("Editing", "autosave").await.unwrap(), None);
        assert!(!store.get_bool("Editing", "autosave", false).await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_and_get_each_value_type() {
        let db = setup().await;
        let store = db.settings_store();

        let values = [
            ("Editing", "autosave", SettingValue::Bool(true)),
            ("MainWindow", "gridSize", SettingValue::Int(40)),
            ("Application", "recentPath", SettingValue::from("/home/maps")),
            (
                "MainWindow",
                "size",
                SettingValue::Size(Size::new(1280, 800)),
            ),
        ];
        for (group, key, value) in &values {
            store.set(group, key, value.clone()).await.unwrap();
        }
        for (group, key, value) in values {
            assert_eq!(store.get(group, key).await.unwrap(), Some(value));
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_upserts_single_row() {
        let db = setup().await;
        let store = db.settings_store();

        store.set("MainWindow", "gridSize", 10_i64.into()).await.unwrap();
        store.set("MainWindow", "gridSize", 20_i64.into()).await.unwrap();

        let entries = store.entries().await.unwrap();
        assert_eq!(
            entries,
            vec![StoredEntry {
                group: "MainWindow".to_string(),
                key: "gridSize".to_string(),
                value: SettingValue::Int(20),
            }]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_deletes_row() {
        let db = setup().await;
        let store = db.settings_store();

        store.set("MainWindow", "fullScreen", true.into()).await.unwrap();
        store.remove("MainWindow", "fullScreen").await.unwrap();

        assert_eq!(store.get("MainWindow", "fullScreen").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_corrupt_row_falls_back_to_default() {
        let db = setup().await;
        let store = db.settings_store();

        db.connection()
            .execute(
                "INSERT INTO preferences (group_name, key, value, updated_at)
                 VALUES ('MainWindow', 'gridSize', '{broken', 0)",
                (),
            )
            .await
            .unwrap();

        assert!(store.get("MainWindow", "gridSize").await.is_err());
        assert_eq!(store.get_int("MainWindow", "gridSize", 12).await, 12);
        assert!(store.entries().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.db");

        {
            let db = Database::open(&path).await.unwrap();
            db.settings_store()
                .set("Editing", "autosave", true.into())
                .await
                .unwrap();
        }

        let db = Database::open(&path).await.unwrap();
        assert!(
            db.settings_store()
                .get_bool("Editing", "autosave", false)
                .await
        );
    }
}
