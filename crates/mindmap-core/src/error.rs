//! Error types for mindmap-core

use thiserror::Error;

/// Result type alias using mindmap-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mindmap-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value could not be converted to the type a setting expects
    #[error("Invalid value for {group}/{key}: {reason}")]
    InvalidValue {
        group: String,
        key: String,
        reason: String,
    },

    /// Setting name not present in the registry
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_value(
        group: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            group: group.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }
}
