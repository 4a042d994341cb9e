//! mindmap-core - Persisted preferences for the mind-map editor
//!
//! This crate contains the typed settings registry, the store backends, and
//! the debounced writer used for settings that change at drag frequency.
//! Front ends (desktop, CLI) go through [`Settings`].

pub mod config;
pub mod db;
pub mod debounce;
pub mod error;
pub mod keys;
pub mod models;
pub mod settings;
pub mod store;
pub mod util;

pub use config::StoreConfig;
pub use debounce::{DebouncedWriter, WriterState, DEFAULT_DEBOUNCE_DELAY};
pub use error::{Error, Result};
pub use keys::{Key, SettingDescriptor, SettingType};
pub use models::{CheckState, EdgeArrowMode, SettingValue, Size};
pub use settings::Settings;
pub use store::{LibSqlSettingsStore, MemoryStore, SettingsStore, SettingsStoreExt};
