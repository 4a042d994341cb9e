//! Runtime configuration for the preference store.
//!
//! Resolution order: built-in defaults, then the JSON config file at
//! `<config_dir>/mindmap/store-config.json`, then environment variables.
//! Front ends apply their own flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::debounce::DEFAULT_DEBOUNCE_DELAY;
use crate::error::{Error, Result};
use crate::util::normalize_text_option;

const CONFIG_FILE_NAME: &str = "store-config.json";
const DB_FILE_NAME: &str = "preferences.db";
const APP_DIR_NAME: &str = "mindmap";
const MAX_DEBOUNCE_DELAY_MS: u64 = 60_000;

/// Overrides the database location
pub const DB_PATH_ENV: &str = "MINDMAP_DB_PATH";
/// Overrides the debounce delay, in milliseconds
pub const DEBOUNCE_MS_ENV: &str = "MINDMAP_DEBOUNCE_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    /// Database file; `None` selects the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// Quiet period for debounced settings
    #[serde(default = "default_debounce_delay_ms")]
    pub debounce_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            db_path: None,
            debounce_delay_ms: default_debounce_delay_ms(),
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

#[allow(clippy::cast_possible_truncation)]
const fn default_debounce_delay_ms() -> u64 {
    DEFAULT_DEBOUNCE_DELAY.as_millis() as u64
}

/// `<config_dir>/mindmap/store-config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve config directory".to_string()))
}

/// `<data_dir>/mindmap/preferences.db`
pub fn default_db_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve data directory".to_string()))
}

impl StoreConfig {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let config = Self::load_from_path(&default_config_path()?)?;
        config.with_overrides(
            std::env::var(DB_PATH_ENV).ok(),
            std::env::var(DEBOUNCE_MS_ENV).ok(),
        )
    }

    /// Missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Apply raw override values (as read from the environment).
    ///
    /// Blank values are ignored.
    pub fn with_overrides(
        mut self,
        db_path: Option<String>,
        debounce_delay_ms: Option<String>,
    ) -> Result<Self> {
        if let Some(path) = normalize_text_option(db_path) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = normalize_text_option(debounce_delay_ms) {
            self.debounce_delay_ms = raw.parse().map_err(|_| {
                Error::Config(format!(
                    "{DEBOUNCE_MS_ENV} must be a whole number of milliseconds, got '{raw}'"
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.debounce_delay_ms == 0 || self.debounce_delay_ms > MAX_DEBOUNCE_DELAY_MS {
            return Err(Error::Config(format!(
                "debounce_delay_ms must be between 1 and {MAX_DEBOUNCE_DELAY_MS}, got {}",
                self.debounce_delay_ms
            )));
        }
        Ok(())
    }

    /// Configured database path, or the platform default
    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }

    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }
}
