//! In-process store without durability

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{SettingsStore, StoredEntry};
use crate::error::Result;
use crate::models::SettingValue;

type Entries = BTreeMap<(String, String), SettingValue>;

/// `BTreeMap`-backed store, mainly for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemoryStore {
    async fn get(&self, group: &str, key: &str) -> Result<Option<SettingValue>> {
        Ok(self
            .lock()
            .get(&(group.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(&self, group: &str, key: &str, value: SettingValue) -> Result<()> {
        self.lock()
            .insert((group.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn remove(&self, group: &str, key: &str) -> Result<()> {
        self.lock().remove(&(group.to_string(), key.to_string()));
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>> {
        Ok(self
            .lock()
            .iter()
            .map(|((group, key), value)| StoredEntry {
                group: group.clone(),
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }
}
