use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::common::parse_bool_arg;

#[derive(Parser)]
#[command(name = "mindmap-settings")]
#[command(about = "Inspect and edit mind-map editor preferences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the preferences database
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Quiet period for debounced settings, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub debounce_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List known settings with their effective values
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one setting, e.g. `MainWindow.gridSize`
    Get {
        /// Setting name as Group.key
        name: String,
    },
    /// Store a new value for a setting
    Set {
        /// Setting name as Group.key
        name: String,
        /// New value (`true`, `12`, `800x600`, `checked`, `double`, ...)
        value: String,
    },
    /// Remove a stored value so the default applies again
    Reset {
        /// Setting name as Group.key
        name: String,
    },
    /// Boolean settings at arbitrary group/key locations
    Generic {
        #[command(subcommand)]
        command: GenericCommands,
    },
    /// Print the resolved config and database locations
    Path,
}

#[derive(Subcommand)]
pub enum GenericCommands {
    /// Read a boolean
    Get {
        group: String,
        key: String,
        /// Value reported when nothing is stored
        #[arg(long, default_value = "false", value_parser = parse_bool_arg)]
        default: bool,
    },
    /// Write a boolean
    Set {
        group: String,
        key: String,
        #[arg(value_parser = parse_bool_arg)]
        value: bool,
    },
}
