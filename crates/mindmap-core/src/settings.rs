//! Preference accessors used by the application
//!
//! Every setting has a load/save pair that goes straight to the store, except
//! grid size, which is saved through a [`DebouncedWriter`] because it changes
//! on every step of a slider drag. Call [`Settings::flush`] before shutting
//! down so a pending grid size is not lost.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::debounce::{DebouncedWriter, DEFAULT_DEBOUNCE_DELAY};
use crate::error::{Error, Result};
use crate::keys::{self, Key, SettingDescriptor, SettingType};
use crate::models::{CheckState, EdgeArrowMode, SettingValue, Size};
use crate::store::{SettingsStore, SettingsStoreExt};
use crate::util::home_dir_or_current;

/// Typed preferences over a [`SettingsStore`]
pub struct Settings<S: SettingsStore> {
    store: Arc<S>,
    grid_size: DebouncedWriter<S, i64>,
}

impl<S: SettingsStore> Settings<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_debounce_delay(store, DEFAULT_DEBOUNCE_DELAY)
    }

    pub fn with_debounce_delay(store: Arc<S>, delay: Duration) -> Self {
        let grid_size = DebouncedWriter::new(Arc::clone(&store), keys::GRID_SIZE, delay);
        Self { store, grid_size }
    }

    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub const fn grid_size_writer(&self) -> &DebouncedWriter<S, i64> {
        &self.grid_size
    }

    /// Read `key`, falling back to `default` when absent or unreadable
    pub async fn load<T: SettingType>(&self, key: &Key<T>, default: T) -> T {
        self.store.get_or(key.group(), key.name(), default).await
    }

    /// Write `key` immediately
    pub async fn save<T: SettingType>(&self, key: &Key<T>, value: T) -> Result<()> {
        if is_grid_size(key.group(), key.name()) {
            self.grid_size.cancel().await;
        }
        self.store
            .set(key.group(), key.name(), value.into_value())
            .await
    }

    /// Forget the stored value so the default applies again
    pub async fn reset<T>(&self, key: &Key<T>) -> Result<()> {
        if is_grid_size(key.group(), key.name()) {
            self.grid_size.cancel().await;
        }
        self.store.remove(key.group(), key.name()).await
    }

    /// Commit every debounced value that is still waiting for its timer
    pub async fn flush(&self) -> Result<()> {
        self.grid_size.flush().await
    }

    pub async fn load_autosave(&self) -> bool {
        self.load(&keys::AUTOSAVE, false).await
    }

    pub async fn save_autosave(&self, autosave: bool) -> Result<()> {
        self.save(&keys::AUTOSAVE, autosave).await
    }

    pub async fn load_auto_snap_state(&self) -> CheckState {
        self.load(&keys::AUTO_SNAP_STATE, CheckState::Unchecked)
            .await
    }

    pub async fn save_auto_snap_state(&self, state: CheckState) -> Result<()> {
        self.save(&keys::AUTO_SNAP_STATE, state).await
    }

    pub async fn load_edge_arrow_mode(&self, default_mode: EdgeArrowMode) -> EdgeArrowMode {
        self.load(&keys::EDGE_ARROW_MODE, default_mode).await
    }

    pub async fn save_edge_arrow_mode(&self, mode: EdgeArrowMode) -> Result<()> {
        self.save(&keys::EDGE_ARROW_MODE, mode).await
    }

    pub async fn load_reversed_edge_direction(&self, default_direction: bool) -> bool {
        self.load(&keys::REVERSED_EDGE_DIRECTION, default_direction)
            .await
    }

    pub async fn save_reversed_edge_direction(&self, reversed: bool) -> Result<()> {
        self.save(&keys::REVERSED_EDGE_DIRECTION, reversed).await
    }

    /// Stored grid size; a value still waiting in the debounced writer is
    /// not visible here until it has been committed.
    pub async fn load_grid_size(&self) -> i64 {
        self.load(&keys::GRID_SIZE, 0).await
    }

    /// Schedule a grid size write. Returns immediately.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn save_grid_size(&self, value: i64) {
        self.grid_size.update(value);
    }

    pub async fn load_grid_visible_state(&self) -> CheckState {
        self.load(&keys::GRID_VISIBLE_STATE, CheckState::Unchecked)
            .await
    }

    pub async fn save_grid_visible_state(&self, state: CheckState) -> Result<()> {
        self.save(&keys::GRID_VISIBLE_STATE, state).await
    }

    pub async fn load_recent_path(&self) -> PathBuf {
        self.load(&keys::RECENT_PATH, home_dir_or_current()).await
    }

    pub async fn save_recent_path(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.save(&keys::RECENT_PATH, path.into()).await
    }

    pub async fn load_recent_image_path(&self) -> PathBuf {
        self.load(&keys::RECENT_IMAGE_PATH, home_dir_or_current())
            .await
    }

    pub async fn save_recent_image_path(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.save(&keys::RECENT_IMAGE_PATH, path.into()).await
    }

    pub async fn load_window_size(&self, default_size: Size) -> Size {
        self.load(&keys::WINDOW_SIZE, default_size).await
    }

    pub async fn save_window_size(&self, size: Size) -> Result<()> {
        self.save(&keys::WINDOW_SIZE, size).await
    }

    pub async fn load_full_screen(&self) -> bool {
        self.load(&keys::WINDOW_FULL_SCREEN, false).await
    }

    pub async fn save_full_screen(&self, full_screen: bool) -> Result<()> {
        self.save(&keys::WINDOW_FULL_SCREEN, full_screen).await
    }

    pub async fn load_select_node_group_by_intersection(&self) -> bool {
        self.load(&keys::SELECT_NODE_GROUP_BY_INTERSECTION, false)
            .await
    }

    pub async fn save_select_node_group_by_intersection(&self, enabled: bool) -> Result<()> {
        self.save(&keys::SELECT_NODE_GROUP_BY_INTERSECTION, enabled)
            .await
    }

    /// Boolean at an arbitrary `group/key`, for settings without a
    /// dedicated accessor
    pub async fn get_generic_boolean(&self, group: &str, key: &str, default_value: bool) -> bool {
        self.load(&Key::custom(group, key), default_value).await
    }

    pub async fn set_generic_boolean(&self, group: &str, key: &str, value: bool) -> Result<()> {
        self.save(&Key::custom(group, key), value).await
    }

    /// Stored value of a registry entry in its canonical shape, or its
    /// default
    pub async fn effective_value(&self, descriptor: &SettingDescriptor) -> SettingValue {
        let group = descriptor.group.as_str();
        match self.store.get(group, descriptor.name).await {
            Ok(Some(stored)) => descriptor.normalize(&stored).unwrap_or_else(|| {
                tracing::warn!(
                    group,
                    key = descriptor.name,
                    stored = stored.type_name(),
                    "Stored setting has an incompatible type, using default"
                );
                descriptor.default_value()
            }),
            Ok(None) => descriptor.default_value(),
            Err(error) => {
                tracing::warn!(group, key = descriptor.name, %error, "Failed to read setting, using default");
                descriptor.default_value()
            }
        }
    }

    /// Save a registry entry from an untyped value, honoring debouncing
    pub async fn save_value(&self, descriptor: &SettingDescriptor, value: SettingValue) -> Result<()> {
        let group = descriptor.group.as_str();
        let value = descriptor.normalize(&value).ok_or_else(|| {
            Error::invalid_value(
                group,
                descriptor.name,
                format!("a {} value cannot hold {value}", descriptor.kind.as_str()),
            )
        })?;

        if descriptor.debounced {
            let size = value.as_int().ok_or_else(|| {
                Error::invalid_value(group, descriptor.name, "expected an integer")
            })?;
            self.save_grid_size(size);
            Ok(())
        } else {
            self.store.set(group, descriptor.name, value).await
        }
    }

    /// Remove a registry entry's stored value
    pub async fn reset_value(&self, descriptor: &SettingDescriptor) -> Result<()> {
        if descriptor.debounced {
            self.grid_size.cancel().await;
        }
        self.store
            .remove(descriptor.group.as_str(), descriptor.name)
            .await
    }
}

/// A write to the grid size key outside the debounced writer supersedes
/// whatever the writer still holds.
fn is_grid_size(group: &str, name: &str) -> bool {
    group == keys::GRID_SIZE.group() && name == keys::GRID_SIZE.name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::WriterState;
    use crate::keys::{find_setting, DEFAULT_WINDOW_SIZE};
    use crate::store::{MemoryStore, StoredEntry};
    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    fn settings() -> Settings<MemoryStore> {
        Settings::new(Arc::new(MemoryStore::new()))
    }

    const SLOW_WRITE: Duration = Duration::from_millis(100);

    /// Memory store whose writes take a while to land
    #[derive(Default)]
    struct SlowStore {
        inner: MemoryStore,
    }

    impl SettingsStore for SlowStore {
        async fn get(&self, group: &str, key: &str) -> Result<Option<SettingValue>> {
            self.inner.get(group, key).await
        }

        async fn set(&self, group: &str, key: &str, value: SettingValue) -> Result<()> {
            sleep(SLOW_WRITE).await;
            self.inner.set(group, key, value).await
        }

        async fn remove(&self, group: &str, key: &str) -> Result<()> {
            self.inner.remove(group, key).await
        }

        async fn entries(&self) -> Result<Vec<StoredEntry>> {
            self.inner.entries().await
        }
    }

    fn slow_settings() -> Settings<SlowStore> {
        Settings::new(Arc::new(SlowStore::default()))
    }

    #[tokio::test]
    async fn test_defaults_when_store_is_empty() {
        let settings = settings();

        assert!(!settings.load_autosave().await);
        assert_eq!(settings.load_auto_snap_state().await, CheckState::Unchecked);
        assert_eq!(
            settings.load_edge_arrow_mode(EdgeArrowMode::Double).await,
            EdgeArrowMode::Double
        );
        assert!(settings.load_reversed_edge_direction(true).await);
        assert_eq!(settings.load_grid_size().await, 0);
        assert_eq!(
            settings.load_grid_visible_state().await,
            CheckState::Unchecked
        );
        assert_eq!(settings.load_recent_path().await, home_dir_or_current());
        assert_eq!(
            settings.load_recent_image_path().await,
            home_dir_or_current()
        );
        assert_eq!(
            settings.load_window_size(Size::new(800, 600)).await,
            Size::new(800, 600)
        );
        assert!(!settings.load_full_screen().await);
        assert!(!settings.load_select_node_group_by_intersection().await);
    }

    #[tokio::test]
    async fn test_immediate_accessors_round_trip() {
        let settings = settings();

        settings.save_autosave(true).await.unwrap();
        settings
            .save_auto_snap_state(CheckState::Checked)
            .await
            .unwrap();
        settings
            .save_edge_arrow_mode(EdgeArrowMode::Hidden)
            .await
            .unwrap();
        settings.save_reversed_edge_direction(true).await.unwrap();
        settings
            .save_grid_visible_state(CheckState::PartiallyChecked)
            .await
            .unwrap();
        settings.save_recent_path("/maps").await.unwrap();
        settings
            .save_recent_image_path("/maps/images")
            .await
            .unwrap();
        settings
            .save_window_size(Size::new(1920, 1080))
            .await
            .unwrap();
        settings.save_full_screen(true).await.unwrap();
        settings
            .save_select_node_group_by_intersection(true)
            .await
            .unwrap();

        assert!(settings.load_autosave().await);
        assert_eq!(settings.load_auto_snap_state().await, CheckState::Checked);
        assert_eq!(
            settings.load_edge_arrow_mode(EdgeArrowMode::Single).await,
            EdgeArrowMode::Hidden
        );
        assert!(settings.load_reversed_edge_direction(false).await);
        assert_eq!(
            settings.load_grid_visible_state().await,
            CheckState::PartiallyChecked
        );
        assert_eq!(settings.load_recent_path().await, PathBuf::from("/maps"));
        assert_eq!(
            settings.load_recent_image_path().await,
            PathBuf::from("/maps/images")
        );
        assert_eq!(
            settings.load_window_size(DEFAULT_WINDOW_SIZE).await,
            Size::new(1920, 1080)
        );
        assert!(settings.load_full_screen().await);
        assert!(settings.load_select_node_group_by_intersection().await);
    }

    #[tokio::test]
    async fn test_immediate_accessors_write_through() {
        let settings = settings();

        settings.save_full_screen(true).await.unwrap();

        assert_eq!(
            settings
                .store()
                .get("MainWindow", "fullScreen")
                .await
                .unwrap(),
            Some(SettingValue::Bool(true))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_grid_size_is_debounced() {
        let settings = settings();

        settings.save_grid_size(10);
        settings.save_grid_size(20);
        assert_eq!(settings.load_grid_size().await, 0);
        assert_eq!(
            settings.grid_size_writer().state(),
            WriterState::Pending
        );

        sleep(DEFAULT_DEBOUNCE_DELAY * 2).await;
        assert_eq!(settings.load_grid_size().await, 20);
        assert_eq!(settings.store().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_commits_pending_grid_size() {
        let settings = settings();

        settings.save_grid_size(42);
        settings.flush().await.unwrap();

        assert_eq!(settings.load_grid_size().await, 42);
    }

    #[tokio::test]
    async fn test_generic_boolean_shares_the_store() {
        let settings = settings();

        assert!(
            settings
                .get_generic_boolean("Effects", "shadows", true)
                .await
        );
        settings
            .set_generic_boolean("Effects", "shadows", false)
            .await
            .unwrap();
        assert!(
            !settings
                .get_generic_boolean("Effects", "shadows", true)
                .await
        );

        settings
            .set_generic_boolean("Editing", "autosave", true)
            .await
            .unwrap();
        assert!(settings.load_autosave().await);
    }

    #[tokio::test]
    async fn test_reset_restores_default() {
        let settings = settings();

        settings.save_autosave(true).await.unwrap();
        settings.reset(&keys::AUTOSAVE).await.unwrap();

        assert!(!settings.load_autosave().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_grid_size_cancels_pending_write() {
        let settings = settings();

        settings.save_grid_size(15);
        settings.reset(&keys::GRID_SIZE).await.unwrap();
        sleep(DEFAULT_DEBOUNCE_DELAY * 2).await;

        assert!(settings.store().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_waits_for_grid_size_commit_in_progress() {
        let settings = slow_settings();
        let grid = find_setting("MainWindow.gridSize").unwrap();

        // The timer has fired and its write is still running when reset starts.
        settings.save_grid_size(5);
        sleep(DEFAULT_DEBOUNCE_DELAY + Duration::from_millis(10)).await;
        settings.reset(&keys::GRID_SIZE).await.unwrap();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(
            settings.store().get("MainWindow", "gridSize").await.unwrap(),
            None
        );

        settings.save_grid_size(6);
        sleep(DEFAULT_DEBOUNCE_DELAY + Duration::from_millis(10)).await;
        settings.reset_value(grid).await.unwrap();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(
            settings.store().get("MainWindow", "gridSize").await.unwrap(),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_grid_size_save_supersedes_pending_value() {
        let settings = settings();

        settings.save_grid_size(5);
        settings.save(&keys::GRID_SIZE, 7).await.unwrap();
        assert_eq!(settings.grid_size_writer().state(), WriterState::Idle);

        sleep(DEFAULT_DEBOUNCE_DELAY * 2).await;
        assert_eq!(settings.load_grid_size().await, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_grid_size_save_waits_for_commit_in_progress() {
        let settings = slow_settings();

        settings.save_grid_size(5);
        sleep(DEFAULT_DEBOUNCE_DELAY + Duration::from_millis(10)).await;
        settings.save(&keys::GRID_SIZE, 7).await.unwrap();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(settings.load_grid_size().await, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generic_boolean_on_grid_size_supersedes_pending_value() {
        let settings = settings();

        settings.save_grid_size(5);
        settings
            .set_generic_boolean("MainWindow", "gridSize", true)
            .await
            .unwrap();

        sleep(DEFAULT_DEBOUNCE_DELAY * 2).await;
        assert_eq!(
            settings.store().get("MainWindow", "gridSize").await.unwrap(),
            Some(SettingValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn test_effective_value_normalizes_or_defaults() {
        let settings = settings();
        let grid = find_setting("MainWindow.gridSize").unwrap();
        let size = find_setting("MainWindow.size").unwrap();

        assert_eq!(settings.effective_value(grid).await, SettingValue::Int(0));

        settings
            .store()
            .set("MainWindow", "gridSize", SettingValue::from("24"))
            .await
            .unwrap();
        assert_eq!(settings.effective_value(grid).await, SettingValue::Int(24));

        settings
            .store()
            .set("MainWindow", "size", SettingValue::Bool(true))
            .await
            .unwrap();
        assert_eq!(
            settings.effective_value(size).await,
            SettingValue::Size(DEFAULT_WINDOW_SIZE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_value_routes_grid_size_through_writer() {
        let settings = settings();
        let grid = find_setting("MainWindow.gridSize").unwrap();
        let autosave = find_setting("Editing.autosave").unwrap();

        settings
            .save_value(grid, SettingValue::Int(30))
            .await
            .unwrap();
        settings
            .save_value(autosave, SettingValue::Bool(true))
            .await
            .unwrap();

        assert_eq!(settings.store().len(), 1);
        settings.flush().await.unwrap();
        assert_eq!(settings.load_grid_size().await, 30);

        let result = settings
            .save_value(grid, SettingValue::Size(Size::new(1, 1)))
            .await;
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
    }
}
