//! mindmap-settings - Inspect and edit mind-map editor preferences
//!
//! Works against the same preference database the editor uses.

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};
use mindmap_core::{LibSqlSettingsStore, Settings};

use crate::cli::{Cli, Commands, GenericCommands};
use crate::commands::common::{open_session, resolve_store_config};
use crate::commands::generic::{run_generic_get, run_generic_set};
use crate::commands::get::run_get;
use crate::commands::list::run_list;
use crate::commands::path::run_path;
use crate::commands::reset::run_reset;
use crate::commands::set::run_set;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let directive = "mindmap=info"
        .parse::<tracing_subscriber::filter::Directive>()
        .map_err(|error| CliError::Config(format!("Invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help().map_err(CliError::Io)?;
        println!();
        return Ok(());
    };

    let config = resolve_store_config(cli.db_path, cli.debounce_ms)?;
    if matches!(command, Commands::Path) {
        return run_path(&config);
    }

    let session = open_session(&config).await?;
    let result = run_command(command, &session.settings).await;

    // Pending debounced values are written even when the command failed.
    let flushed = session.settings.flush().await;
    result?;
    flushed?;
    Ok(())
}

async fn run_command(
    command: Commands,
    settings: &Settings<LibSqlSettingsStore>,
) -> Result<(), CliError> {
    match command {
        Commands::List { json } => run_list(settings, json).await,
        Commands::Get { name } => run_get(settings, &name).await,
        Commands::Set { name, value } => run_set(settings, &name, &value).await,
        Commands::Reset { name } => run_reset(settings, &name).await,
        Commands::Generic { command } => match command {
            GenericCommands::Get {
                group,
                key,
                default,
            } => run_generic_get(settings, &group, &key, default).await,
            GenericCommands::Set { group, key, value } => {
                run_generic_set(settings, &group, &key, value).await
            }
        },
        // Resolved before the database is opened
        Commands::Path => Ok(()),
    }
}
