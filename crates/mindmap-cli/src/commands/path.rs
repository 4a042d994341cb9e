use mindmap_core::config::default_config_path;
use mindmap_core::StoreConfig;

use crate::error::CliError;

pub fn run_path(config: &StoreConfig) -> Result<(), CliError> {
    println!("config:   {}", default_config_path()?.display());
    println!("database: {}", config.resolved_db_path()?.display());
    Ok(())
}
