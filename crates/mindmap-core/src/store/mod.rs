//! Grouped key/value persistence for preferences
//!
//! [`SettingsStore`] is the boundary to whatever actually keeps the values.
//! Reads through [`SettingsStoreExt`] never fail: an absent key, a backend
//! error, or a value of the wrong shape all yield the caller's default.

mod libsql_store;
mod memory;

use std::future::Future;

use serde::Serialize;

use crate::error::Result;
use crate::keys::SettingType;
use crate::models::{SettingValue, Size};

pub use libsql_store::LibSqlSettingsStore;
pub use memory::MemoryStore;

/// One persisted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredEntry {
    pub group: String,
    pub key: String,
    pub value: SettingValue,
}

/// Backend storage operations.
///
/// Futures are `Send` so a store can be driven from spawned tasks.
pub trait SettingsStore: Send + Sync + 'static {
    /// Raw value at `group/key`, `None` when absent
    fn get(
        &self,
        group: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<SettingValue>>> + Send;

    /// Insert or replace the value at `group/key`
    fn set(
        &self,
        group: &str,
        key: &str,
        value: SettingValue,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove `group/key`; removing an absent key is not an error
    fn remove(&self, group: &str, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Every stored row, ordered by group then key
    fn entries(&self) -> impl Future<Output = Result<Vec<StoredEntry>>> + Send;
}

/// Typed reads with caller-supplied defaults
#[allow(async_fn_in_trait)]
pub trait SettingsStoreExt: SettingsStore {
    async fn get_or<T: SettingType>(&self, group: &str, key: &str, default: T) -> T {
        match self.get(group, key).await {
            Ok(Some(value)) => T::from_value(&value).unwrap_or_else(|| {
                tracing::warn!(
                    group,
                    key,
                    stored = value.type_name(),
                    "Stored setting has an incompatible type, using default"
                );
                default
            }),
            Ok(None) => default,
            Err(error) => {
                tracing::warn!(group, key, %error, "Failed to read setting, using default");
                default
            }
        }
    }

    async fn get_bool(&self, group: &str, key: &str, default: bool) -> bool {
        self.get_or(group, key, default).await
    }

    async fn get_int(&self, group: &str, key: &str, default: i64) -> i64 {
        self.get_or(group, key, default).await
    }

    async fn get_string(&self, group: &str, key: &str, default: &str) -> String {
        self.get_or(group, key, default.to_string()).await
    }

    async fn get_size(&self, group: &str, key: &str, default: Size) -> Size {
        self.get_or(group, key, default).await
    }
}

impl<S: SettingsStore> SettingsStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_reads_fall_back_to_default_when_absent() {
        let store = MemoryStore::new();

        assert!(store.get_bool("Editing", "autosave", true).await);
        assert_eq!(store.get_int("MainWindow", "gridSize", 7).await, 7);
        assert_eq!(
            store.get_string("Application", "recentPath", "/home").await,
            "/home"
        );
        assert_eq!(
            store
                .get_size("MainWindow", "size", Size::new(10, 20))
                .await,
            Size::new(10, 20)
        );
    }

    #[tokio::test]
    async fn test_typed_reads_return_stored_values() {
        let store = MemoryStore::new();
        store
            .set("MainWindow", "size", Size::new(640, 480).into())
            .await
            .unwrap();
        store
            .set("MainWindow", "gridSize", SettingValue::Int(25))
            .await
            .unwrap();

        assert_eq!(
            store.get_size("MainWindow", "size", Size::default()).await,
            Size::new(640, 480)
        );
        assert_eq!(store.get_int("MainWindow", "gridSize", 0).await, 25);
    }

    #[tokio::test]
    async fn test_unrecognized_boolean_text_uses_default() {
        let store = MemoryStore::new();
        store
            .set("Editing", "autosave", SettingValue::from("sometimes"))
            .await
            .unwrap();
        assert!(store.get_bool("Editing", "autosave", true).await);
        assert!(!store.get_bool("Editing", "autosave", false).await);

        store
            .set("Editing", "autosave", SettingValue::from("off"))
            .await
            .unwrap();
        assert!(!store.get_bool("Editing", "autosave", true).await);
    }

    #[tokio::test]
    async fn test_incompatible_value_uses_default() {
        let store = MemoryStore::new();
        store
            .set("MainWindow", "gridSize", SettingValue::from("wide"))
            .await
            .unwrap();

        assert_eq!(store.get_int("MainWindow", "gridSize", 3).await, 3);
    }
}
