//! Enumerated preference values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tri-state checkbox value, stored as its integer discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    #[default]
    Unchecked = 0,
    PartiallyChecked = 1,
    Checked = 2,
}

impl CheckState {
    /// Unknown integers map to `Unchecked`.
    pub const fn from_int(value: i64) -> Self {
        match value {
            1 => Self::PartiallyChecked,
            2 => Self::Checked,
            _ => Self::Unchecked,
        }
    }

    pub const fn as_int(self) -> i64 {
        self as i64
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::PartiallyChecked => "partially_checked",
            Self::Checked => "checked",
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "unchecked" | "off" | "false" => Ok(Self::Unchecked),
            "1" | "partial" | "partially_checked" => Ok(Self::PartiallyChecked),
            "2" | "checked" | "on" | "true" => Ok(Self::Checked),
            other => Err(format!(
                "expected unchecked, partially_checked or checked, got '{other}'"
            )),
        }
    }
}

/// How arrows are drawn on edges between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeArrowMode {
    #[default]
    Single = 0,
    Double = 1,
    Hidden = 2,
}

impl EdgeArrowMode {
    pub const fn from_int(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Single),
            1 => Some(Self::Double),
            2 => Some(Self::Hidden),
            _ => None,
        }
    }

    pub const fn as_int(self) -> i64 {
        self as i64
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for EdgeArrowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeArrowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "single" => Ok(Self::Single),
            "1" | "double" => Ok(Self::Double),
            "2" | "hidden" => Ok(Self::Hidden),
            other => Err(format!("expected single, double or hidden, got '{other}'")),
        }
    }
}
