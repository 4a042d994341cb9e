//! Shared utility functions used across multiple modules.

use std::path::PathBuf;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Interpret common textual spellings of a boolean.
///
/// Empty text counts as false. Returns `None` for anything unrecognized.
pub fn parse_bool_text(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// User home directory, or the current directory when it cannot be resolved.
pub fn home_dir_or_current() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Current Unix timestamp in milliseconds.
pub fn unix_timestamp_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" /tmp/maps ".to_string())),
            Some("/tmp/maps".to_string())
        );
    }

    #[test]
    fn parse_bool_text_accepts_common_spellings() {
        assert_eq!(parse_bool_text("TRUE"), Some(true));
        assert_eq!(parse_bool_text(" on "), Some(true));
        assert_eq!(parse_bool_text("1"), Some(true));
        assert_eq!(parse_bool_text("off"), Some(false));
        assert_eq!(parse_bool_text(""), Some(false));
        assert_eq!(parse_bool_text("maybe"), None);
    }
}
