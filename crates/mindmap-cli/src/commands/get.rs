use mindmap_core::keys::require_setting;
use mindmap_core::{Settings, SettingsStore};

use crate::error::CliError;

/// Effective value of a registry setting, rendered for display
pub async fn describe_setting<S: SettingsStore>(
    settings: &Settings<S>,
    name: &str,
) -> Result<String, CliError> {
    let descriptor = require_setting(name)?;
    let value = settings.effective_value(descriptor).await;
    Ok(descriptor.display_value(&value))
}

pub async fn run_get<S: SettingsStore>(settings: &Settings<S>, name: &str) -> Result<(), CliError> {
    println!("{}", describe_setting(settings, name).await?);
    Ok(())
}
