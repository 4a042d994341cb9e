use mindmap_core::{Settings, SettingsStore};

use crate::commands::common::{collect_settings, format_setting_lines};
use crate::error::CliError;

pub async fn run_list<S: SettingsStore>(
    settings: &Settings<S>,
    as_json: bool,
) -> Result<(), CliError> {
    let items = collect_settings(settings).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_setting_lines(&items) {
            println!("{line}");
        }
    }

    Ok(())
}
