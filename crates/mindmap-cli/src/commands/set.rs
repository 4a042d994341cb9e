use mindmap_core::keys::require_setting;
use mindmap_core::{Settings, SettingsStore};

use crate::error::CliError;

/// Parse `raw` for the named setting and save it.
///
/// Debounced settings are only queued here; the caller flushes before exit.
pub async fn apply_set<S: SettingsStore>(
    settings: &Settings<S>,
    name: &str,
    raw: &str,
) -> Result<String, CliError> {
    let descriptor = require_setting(name)?;
    let value = descriptor.parse_value(raw)?;
    let display = descriptor.display_value(&value);
    settings.save_value(descriptor, value).await?;
    Ok(format!("{} = {display}", descriptor.qualified_name()))
}

pub async fn run_set<S: SettingsStore>(
    settings: &Settings<S>,
    name: &str,
    raw: &str,
) -> Result<(), CliError> {
    println!("{}", apply_set(settings, name, raw).await?);
    Ok(())
}
