//! Stored setting values and their conversions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::parse_bool_text;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error returned when text is not of the form `WIDTHxHEIGHT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError(String);

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected WIDTHxHEIGHT, got '{}'", self.0)
    }
}

impl std::error::Error for ParseSizeError {}

impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (width, height) = trimmed
            .split_once(['x', 'X'])
            .ok_or_else(|| ParseSizeError(trimmed.to_string()))?;
        let width = width
            .trim()
            .parse()
            .map_err(|_| ParseSizeError(trimmed.to_string()))?;
        let height = height
            .trim()
            .parse()
            .map_err(|_| ParseSizeError(trimmed.to_string()))?;
        Ok(Self { width, height })
    }
}

/// A value held by the settings store.
///
/// Serialized untagged so the stored JSON stays readable: `true`, `42`,
/// `"~/maps"`, `{"width":800,"height":600}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Size(Size),
    Text(String),
}

impl SettingValue {
    /// Short type name used in logs and error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Size(_) => "size",
            Self::Text(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(value) => Some(*value != 0),
            Self::Text(value) => parse_bool_text(value),
            Self::Size(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Bool(value) => Some(i64::from(*value)),
            Self::Text(value) => value.trim().parse().ok(),
            Self::Size(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value.clone()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Size(value) => Some(value.to_string()),
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            Self::Size(value) => Some(*value),
            Self::Text(value) => value.parse().ok(),
            Self::Bool(_) | Self::Int(_) => None,
        }
    }

    /// Encode for a text column
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a text column
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Size(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Size> for SettingValue {
    fn from(value: Size) -> Self {
        Self::Size(value)
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
