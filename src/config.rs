use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::storage::{read_file, StorageError};
use crate::dnd::autoscroll::ScrollSpeed;

/// Ambient settings injected into the controllers when regions are wired up.
///
/// ```toml
/// [auto_scroll]
/// over_element_enabled = true
/// overflow_enabled = true
/// column_scroll_speed = "standard"
///
/// [debug]
/// hitboxes_visible = false
///
/// [pan]
/// threshold = 10
///
/// [preview]
/// tilt = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_scroll: AutoScrollSettings,
    pub debug: DebugSettings,
    pub pan: PanSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollSettings {
    /// Scroll a column while the pointer is near its edge.
    pub over_element_enabled: bool,
    /// Keep scrolling a column while the pointer is past its edge. Needs
    /// `over_element_enabled`.
    pub overflow_enabled: bool,
    pub column_scroll_speed: ScrollSpeed,
}

impl Default for AutoScrollSettings {
    fn default() -> Self {
        Self {
            over_element_enabled: true,
            overflow_enabled: true,
            column_scroll_speed: ScrollSpeed::Standard,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub hitboxes_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanSettings {
    /// Cells the pointer must travel on either axis before a pan starts.
    pub threshold: u16,
}

impl Default for PanSettings {
    fn default() -> Self {
        Self { threshold: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub tilt: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { tilt: true }
    }
}

/// One toggleable line of the settings overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    OverElementAutoScroll,
    OverflowAutoScroll,
    ColumnScrollSpeed,
    Hitboxes,
    PreviewTilt,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        Self::OverElementAutoScroll,
        Self::OverflowAutoScroll,
        Self::ColumnScrollSpeed,
        Self::Hitboxes,
        Self::PreviewTilt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OverElementAutoScroll => "Column auto-scroll",
            Self::OverflowAutoScroll => "Overflow auto-scroll",
            Self::ColumnScrollSpeed => "Column scroll speed",
            Self::Hitboxes => "Show hitboxes",
            Self::PreviewTilt => "Tilt drag preview",
        }
    }
}

impl Settings {
    /// Display value of a field.
    pub fn value(&self, field: SettingsField) -> String {
        let on_off = |b: bool| String::from(if b { "on" } else { "off" });
        match field {
            SettingsField::OverElementAutoScroll => on_off(self.auto_scroll.over_element_enabled),
            SettingsField::OverflowAutoScroll => on_off(self.auto_scroll.overflow_enabled),
            SettingsField::ColumnScrollSpeed => self.auto_scroll.column_scroll_speed.as_str().to_string(),
            SettingsField::Hitboxes => on_off(self.debug.hitboxes_visible),
            SettingsField::PreviewTilt => on_off(self.preview.tilt),
        }
    }

    pub fn toggle(&mut self, field: SettingsField) {
        match field {
            SettingsField::OverElementAutoScroll => {
                self.auto_scroll.over_element_enabled = !self.auto_scroll.over_element_enabled;
            }
            SettingsField::OverflowAutoScroll => {
                self.auto_scroll.overflow_enabled = !self.auto_scroll.overflow_enabled;
            }
            SettingsField::ColumnScrollSpeed => {
                self.auto_scroll.column_scroll_speed = self.auto_scroll.column_scroll_speed.toggled();
            }
            SettingsField::Hitboxes => self.debug.hitboxes_visible = !self.debug.hitboxes_visible,
            SettingsField::PreviewTilt => self.preview.tilt = !self.preview.tilt,
        }
    }
}

pub fn parse_settings(toml_str: &str) -> Result<Settings, StorageError> {
    Ok(toml::from_str(toml_str)?)
}

/// Load settings from a TOML file. Missing keys take their defaults.
pub fn load_settings(path: &Path) -> Result<Settings, StorageError> {
    let content = read_file(path)?;
    parse_settings(&content)
}
