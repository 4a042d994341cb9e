//! Typed settings registry
//!
//! Every persisted preference is addressed by a [`Key<T>`], which pairs the
//! store location (group + name) with the Rust type the value converts to.
//! [`KNOWN_SETTINGS`] describes the same keys at runtime for tooling that
//! works with names typed by a user.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::{CheckState, EdgeArrowMode, SettingValue, Size};
use crate::util::{home_dir_or_current, parse_bool_text};

/// Named sections of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Application,
    Defaults,
    Editing,
    MainWindow,
}

impl Group {
    pub const ALL: [Self; 4] = [
        Self::Application,
        Self::Defaults,
        Self::Editing,
        Self::MainWindow,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Defaults => "Defaults",
            Self::Editing => "Editing",
            Self::MainWindow => "MainWindow",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion between a Rust type and the stored [`SettingValue`]
pub trait SettingType: Sized + Clone + Send + Sync + 'static {
    /// `None` when the stored value cannot represent `Self`
    fn from_value(value: &SettingValue) -> Option<Self>;

    fn into_value(self) -> SettingValue;
}

impl SettingType for bool {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Bool(self)
    }
}

impl SettingType for i64 {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_int()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Int(self)
    }
}

impl SettingType for String {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_text()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Text(self)
    }
}

impl SettingType for PathBuf {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_text().map(Self::from)
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Text(self.to_string_lossy().into_owned())
    }
}

impl SettingType for Size {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_size()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Size(self)
    }
}

impl SettingType for CheckState {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_int().map(Self::from_int)
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Int(self.as_int())
    }
}

impl SettingType for EdgeArrowMode {
    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_int().and_then(Self::from_int)
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Int(self.as_int())
    }
}

/// Typed address of a single setting
pub struct Key<T> {
    group: Cow<'static, str>,
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(group: Group, name: &'static str) -> Self {
        Self {
            group: Cow::Borrowed(group.as_str()),
            name: Cow::Borrowed(name),
            _marker: PhantomData,
        }
    }

    /// Key in an arbitrary group, for settings without a registry entry
    pub fn custom(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: Cow::Owned(group.into()),
            name: Cow::Owned(name.into()),
            _marker: PhantomData,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Group.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        Self {
            group: self.group.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish()
    }
}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.name == other.name
    }
}

impl<T> Eq for Key<T> {}

pub const RECENT_PATH: Key<PathBuf> = Key::new(Group::Application, "recentPath");
pub const RECENT_IMAGE_PATH: Key<PathBuf> = Key::new(Group::Application, "recentImagePath");

pub const EDGE_ARROW_MODE: Key<EdgeArrowMode> = Key::new(Group::Defaults, "edgeArrowMode");
pub const REVERSED_EDGE_DIRECTION: Key<bool> = Key::new(Group::Defaults, "reversedEdgeDirection");
pub const SELECT_NODE_GROUP_BY_INTERSECTION: Key<bool> =
    Key::new(Group::Defaults, "selectNodeGroupByIntersection");

pub const AUTOSAVE: Key<bool> = Key::new(Group::Editing, "autosave");

pub const AUTO_SNAP_STATE: Key<CheckState> = Key::new(Group::MainWindow, "autoSnap");
pub const GRID_SIZE: Key<i64> = Key::new(Group::MainWindow, "gridSize");
pub const GRID_VISIBLE_STATE: Key<CheckState> = Key::new(Group::MainWindow, "gridVisibleState");
pub const WINDOW_SIZE: Key<Size> = Key::new(Group::MainWindow, "size");
pub const WINDOW_FULL_SCREEN: Key<bool> = Key::new(Group::MainWindow, "fullScreen");

/// Window size used when nothing has been stored yet
pub const DEFAULT_WINDOW_SIZE: Size = Size::new(1024, 768);

/// Value type of a registry entry, as seen by tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Bool,
    Int,
    Path,
    Size,
    CheckState,
    EdgeArrowMode,
}

impl SettingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Path => "path",
            Self::Size => "size",
            Self::CheckState => "check-state",
            Self::EdgeArrowMode => "edge-arrow-mode",
        }
    }
}

/// Runtime description of one registry entry
#[derive(Debug, Clone, Copy)]
pub struct SettingDescriptor {
    pub group: Group,
    pub name: &'static str,
    pub kind: SettingKind,
    /// Value written through the debounced path rather than immediately
    pub debounced: bool,
    default: fn() -> SettingValue,
}

impl SettingDescriptor {
    /// `Group.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }

    pub fn default_value(&self) -> SettingValue {
        (self.default)()
    }

    /// Parse user-entered text into the value stored for this setting
    pub fn parse_value(&self, raw: &str) -> Result<SettingValue> {
        let invalid = |reason: String| Error::invalid_value(self.group.as_str(), self.name, reason);
        let raw = raw.trim();
        match self.kind {
            SettingKind::Bool => parse_bool_text(raw)
                .filter(|_| !raw.is_empty())
                .map(SettingValue::Bool)
                .ok_or_else(|| invalid(format!("expected true or false, got '{raw}'"))),
            SettingKind::Int => raw
                .parse()
                .map(SettingValue::Int)
                .map_err(|_| invalid(format!("expected an integer, got '{raw}'"))),
            SettingKind::Path => {
                if raw.is_empty() {
                    Err(invalid("path must not be empty".to_string()))
                } else {
                    Ok(SettingValue::Text(raw.to_string()))
                }
            }
            SettingKind::Size => raw
                .parse::<Size>()
                .map(SettingValue::Size)
                .map_err(|error| invalid(error.to_string())),
            SettingKind::CheckState => raw
                .parse::<CheckState>()
                .map(CheckState::into_value)
                .map_err(invalid),
            SettingKind::EdgeArrowMode => raw
                .parse::<EdgeArrowMode>()
                .map(EdgeArrowMode::into_value)
                .map_err(invalid),
        }
    }

    /// Convert a stored value to this setting's canonical shape.
    ///
    /// `None` when the value cannot represent the setting, in which case
    /// the default applies.
    pub fn normalize(&self, value: &SettingValue) -> Option<SettingValue> {
        match self.kind {
            SettingKind::Bool => value.as_bool().map(SettingValue::Bool),
            SettingKind::Int => value.as_int().map(SettingValue::Int),
            SettingKind::Path => value.as_text().map(SettingValue::Text),
            SettingKind::Size => value.as_size().map(SettingValue::Size),
            SettingKind::CheckState => CheckState::from_value(value).map(CheckState::into_value),
            SettingKind::EdgeArrowMode => {
                EdgeArrowMode::from_value(value).map(EdgeArrowMode::into_value)
            }
        }
    }

    /// Human readable rendering of a stored value for this setting
    pub fn display_value(&self, value: &SettingValue) -> String {
        match self.kind {
            SettingKind::CheckState => value
                .as_int()
                .map_or_else(|| value.to_string(), |v| CheckState::from_int(v).to_string()),
            SettingKind::EdgeArrowMode => value
                .as_int()
                .and_then(EdgeArrowMode::from_int)
                .map_or_else(|| value.to_string(), |mode| mode.to_string()),
            _ => value.to_string(),
        }
    }
}

fn default_false() -> SettingValue {
    SettingValue::Bool(false)
}

fn default_home_dir() -> SettingValue {
    home_dir_or_current().into_value()
}

fn default_unchecked() -> SettingValue {
    CheckState::Unchecked.into_value()
}

fn default_grid_size() -> SettingValue {
    SettingValue::Int(0)
}

fn default_edge_arrow_mode() -> SettingValue {
    EdgeArrowMode::default().into_value()
}

fn default_window_size() -> SettingValue {
    DEFAULT_WINDOW_SIZE.into_value()
}

const fn descriptor(
    group: Group,
    name: &'static str,
    kind: SettingKind,
    default: fn() -> SettingValue,
) -> SettingDescriptor {
    SettingDescriptor {
        group,
        name,
        kind,
        debounced: false,
        default,
    }
}

/// Every preference the application persists
pub const KNOWN_SETTINGS: &[SettingDescriptor] = &[
    descriptor(Group::Application, "recentPath", SettingKind::Path, default_home_dir),
    descriptor(Group::Application, "recentImagePath", SettingKind::Path, default_home_dir),
    descriptor(
        Group::Defaults,
        "edgeArrowMode",
        SettingKind::EdgeArrowMode,
        default_edge_arrow_mode,
    ),
    descriptor(Group::Defaults, "reversedEdgeDirection", SettingKind::Bool, default_false),
    descriptor(
        Group::Defaults,
        "selectNodeGroupByIntersection",
        SettingKind::Bool,
        default_false,
    ),
    descriptor(Group::Editing, "autosave", SettingKind::Bool, default_false),
    descriptor(Group::MainWindow, "autoSnap", SettingKind::CheckState, default_unchecked),
    SettingDescriptor {
        debounced: true,
        ..descriptor(Group::MainWindow, "gridSize", SettingKind::Int, default_grid_size)
    },
    descriptor(
        Group::MainWindow,
        "gridVisibleState",
        SettingKind::CheckState,
        default_unchecked,
    ),
    descriptor(Group::MainWindow, "size", SettingKind::Size, default_window_size),
    descriptor(Group::MainWindow, "fullScreen", SettingKind::Bool, default_false),
];

/// Look up a registry entry by `Group.name` (case-insensitive)
pub fn find_setting(qualified_name: &str) -> Option<&'static SettingDescriptor> {
    let (group, name) = qualified_name.trim().split_once('.')?;
    KNOWN_SETTINGS.iter().find(|descriptor| {
        descriptor.group.as_str().eq_ignore_ascii_case(group)
            && descriptor.name.eq_ignore_ascii_case(name)
    })
}

/// Like [`find_setting`] but reports unknown names as an error
pub fn require_setting(qualified_name: &str) -> Result<&'static SettingDescriptor> {
    find_setting(qualified_name).ok_or_else(|| Error::UnknownSetting(qualified_name.to_string()))
}
