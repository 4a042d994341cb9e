//! Data models for mindmap preferences

mod settings;
mod value;

pub use settings::{CheckState, EdgeArrowMode};
pub use value::{ParseSizeError, SettingValue, Size};
