//! Picker configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! gives the stock picker.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::normalize_hex;
use crate::error::Result;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::palette::{clamp_palette_size, HarmonyRule};

/// Starting color when nothing is persisted.
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Picker configuration loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    /// Selected color on first start or after storage recovery
    #[serde(default = "default_color")]
    pub default_color: String,

    /// Maximum number of history entries
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Rule preselected in the UI
    #[serde(default)]
    pub default_rule: HarmonyRule,

    /// Palette size preselected in the UI
    #[serde(default = "default_palette_size")]
    pub default_size: usize,

    /// Keys used in the key-value store
    #[serde(default)]
    pub storage_keys: StorageKeys,

    /// File name offered when downloading a palette
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

/// Key names under which picker state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageKeys {
    #[serde(default = "default_base_color_key")]
    pub base_color: String,
    #[serde(default = "default_history_key")]
    pub history: String,
    #[serde(default = "default_palette_key")]
    pub palette: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_palette_size() -> usize {
    5
}

fn default_export_file_name() -> String {
    "color_palette.txt".to_string()
}

fn default_base_color_key() -> String {
    "paletteMakerBaseColor".to_string()
}

fn default_history_key() -> String {
    "paletteMakerHistory".to_string()
}

fn default_palette_key() -> String {
    "paletteMakerPalette".to_string()
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            base_color: default_base_color_key(),
            history: default_history_key(),
            palette: default_palette_key(),
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            history_capacity: default_history_capacity(),
            default_rule: HarmonyRule::default(),
            default_size: default_palette_size(),
            storage_keys: StorageKeys::default(),
            export_file_name: default_export_file_name(),
        }
    }
}

impl PickerConfig {
    /// Parse a JSON config and normalise it.
    ///
    /// # Errors
    /// Returns [`crate::SwatchError::Json`] for malformed JSON and
    /// [`crate::SwatchError::InvalidHex`] for a bad default color.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.normalized()
    }

    /// Load a JSON config file.
    ///
    /// # Errors
    /// I/O, JSON and validation errors as in [`PickerConfig::from_json`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), "Loaded picker configuration");
        Ok(config)
    }

    /// Canonicalise the default color and pull sizes into range.
    fn normalized(mut self) -> Result<Self> {
        self.default_color = normalize_hex(&self.default_color)?;
        self.default_size =
            clamp_palette_size(i64::try_from(self.default_size).unwrap_or(i64::MAX));
        self.history_capacity = self.history_capacity.max(1);
        Ok(self)
    }
}
