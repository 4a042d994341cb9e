use mindmap_core::keys::require_setting;
use mindmap_core::{Settings, SettingsStore};

use crate::error::CliError;

pub async fn run_reset<S: SettingsStore>(
    settings: &Settings<S>,
    name: &str,
) -> Result<(), CliError> {
    let descriptor = require_setting(name)?;
    settings.reset_value(descriptor).await?;

    let default = descriptor.default_value();
    println!(
        "{} reset to {}",
        descriptor.qualified_name(),
        descriptor.display_value(&default)
    );
    Ok(())
}
