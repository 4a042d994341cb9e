use std::path::PathBuf;
use std::sync::Arc;

use mindmap_core::db::Database;
use mindmap_core::keys::KNOWN_SETTINGS;
use mindmap_core::util::{normalize_text_option, parse_bool_text};
use mindmap_core::{LibSqlSettingsStore, SettingValue, Settings, SettingsStore, StoreConfig};
use serde::Serialize;

use crate::error::CliError;

/// Open database plus the settings facade built on it
pub struct Session {
    _db: Database,
    pub settings: Settings<LibSqlSettingsStore>,
}

#[derive(Debug, Serialize)]
pub struct SettingListItem {
    pub name: String,
    pub kind: String,
    pub value: SettingValue,
    pub display: String,
    pub stored: bool,
}

pub fn resolve_store_config(
    db_path: Option<PathBuf>,
    debounce_ms: Option<u64>,
) -> Result<StoreConfig, CliError> {
    apply_cli_overrides(StoreConfig::load()?, db_path, debounce_ms)
}

pub fn apply_cli_overrides(
    mut config: StoreConfig,
    db_path: Option<PathBuf>,
    debounce_ms: Option<u64>,
) -> Result<StoreConfig, CliError> {
    if let Some(path) = db_path {
        config.db_path = Some(path);
    }
    if let Some(delay) = debounce_ms {
        config.debounce_delay_ms = delay;
    }
    config.validate()?;
    Ok(config)
}

pub async fn open_session(config: &StoreConfig) -> Result<Session, CliError> {
    let db_path = config.resolved_db_path()?;
    let db = Database::open(&db_path).await?;
    let store = Arc::new(db.settings_store());
    let settings = Settings::with_debounce_delay(store, config.debounce_delay());
    tracing::debug!(path = %db_path.display(), "Opened preference database");
    Ok(Session { _db: db, settings })
}

/// clap value parser for boolean arguments
pub fn parse_bool_arg(raw: &str) -> Result<bool, String> {
    if raw.trim().is_empty() {
        return Err("expected true or false, got an empty value".to_string());
    }
    parse_bool_text(raw).ok_or_else(|| format!("expected true or false, got '{raw}'"))
}

pub fn normalize_generic_key(group: &str, key: &str) -> Result<(String, String), CliError> {
    let group = normalize_text_option(Some(group.to_string()));
    let key = normalize_text_option(Some(key.to_string()));
    match (group, key) {
        (Some(group), Some(key)) => Ok((group, key)),
        _ => Err(CliError::EmptyGenericKey),
    }
}

/// Registry settings with their effective values, followed by stored
/// entries the registry does not know about
pub async fn collect_settings<S: SettingsStore>(
    settings: &Settings<S>,
) -> Result<Vec<SettingListItem>, CliError> {
    let entries = settings.store().entries().await?;
    let is_stored = |group: &str, key: &str| {
        entries
            .iter()
            .any(|entry| entry.group == group && entry.key == key)
    };

    let mut items = Vec::with_capacity(KNOWN_SETTINGS.len());
    for descriptor in KNOWN_SETTINGS {
        let value = settings.effective_value(descriptor).await;
        items.push(SettingListItem {
            name: descriptor.qualified_name(),
            kind: descriptor.kind.as_str().to_string(),
            display: descriptor.display_value(&value),
            stored: is_stored(descriptor.group.as_str(), descriptor.name),
            value,
        });
    }

    for entry in &entries {
        let known = KNOWN_SETTINGS.iter().any(|descriptor| {
            descriptor.group.as_str() == entry.group && descriptor.name == entry.key
        });
        if known {
            continue;
        }
        items.push(SettingListItem {
            name: format!("{}.{}", entry.group, entry.key),
            kind: entry.value.type_name().to_string(),
            display: entry.value.to_string(),
            stored: true,
            value: entry.value.clone(),
        });
    }

    Ok(items)
}

pub fn format_setting_lines(items: &[SettingListItem]) -> Vec<String> {
    let width = items
        .iter()
        .map(|item| item.name.len())
        .max()
        .unwrap_or_default();

    items
        .iter()
        .map(|item| {
            let marker = if item.stored { "" } else { "  (default)" };
            format!("{:<width$}  {}{marker}", item.name, item.display)
        })
        .collect()
}
