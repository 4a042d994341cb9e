use mindmap_core::{Settings, SettingsStore};

use crate::commands::common::normalize_generic_key;
use crate::error::CliError;

pub async fn read_generic<S: SettingsStore>(
    settings: &Settings<S>,
    group: &str,
    key: &str,
    default_value: bool,
) -> Result<bool, CliError> {
    let (group, key) = normalize_generic_key(group, key)?;
    Ok(settings
        .get_generic_boolean(&group, &key, default_value)
        .await)
}

pub async fn write_generic<S: SettingsStore>(
    settings: &Settings<S>,
    group: &str,
    key: &str,
    value: bool,
) -> Result<(), CliError> {
    let (group, key) = normalize_generic_key(group, key)?;
    settings.set_generic_boolean(&group, &key, value).await?;
    Ok(())
}

pub async fn run_generic_get<S: SettingsStore>(
    settings: &Settings<S>,
    group: &str,
    key: &str,
    default_value: bool,
) -> Result<(), CliError> {
    println!("{}", read_generic(settings, group, key, default_value).await?);
    Ok(())
}

pub async fn run_generic_set<S: SettingsStore>(
    settings: &Settings<S>,
    group: &str,
    key: &str,
    value: bool,
) -> Result<(), CliError> {
    write_generic(settings, group, key, value).await?;
    println!("{}.{} = {value}", group.trim(), key.trim());
    Ok(())
}
