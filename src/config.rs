//! Theme settings supplied by the page layout.
//!
//! The layout renders three globals before loading the wasm module:
//! `isAutoTheme`, `darkBtn` and `lightBtn`. The same shape is accepted as JSON
//! for callers that embed the settings elsewhere.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use serde::Deserialize;

use crate::consts::{AUTO_THEME_GLOBAL, DARK_LABEL_GLOBAL, LIGHT_LABEL_GLOBAL};
use crate::dom::Document;

pub const DEFAULT_DARK_LABEL: &str = "Dark";
pub const DEFAULT_LIGHT_LABEL: &str = "Light";

/// Errors produced while reading [`ThemeSettings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings JSON could not be parsed.
    #[error("theme settings parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Whether theme initialization runs at all.
    #[serde(rename = "isAutoTheme")]
    pub auto_theme: bool,
    /// Toggle label while the light theme is active.
    #[serde(rename = "darkBtn")]
    pub dark_label: String,
    /// Toggle label while the dark theme is active.
    #[serde(rename = "lightBtn")]
    pub light_label: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            auto_theme: false,
            dark_label: DEFAULT_DARK_LABEL.to_owned(),
            light_label: DEFAULT_LIGHT_LABEL.to_owned(),
        }
    }
}

impl ThemeSettings {
    /// Parse settings from a JSON object. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read settings from the page globals, falling back to defaults for any
    /// global the layout did not define.
    pub fn from_document<D: Document>(document: &D) -> Self {
        let defaults = Self::default();
        Self {
            auto_theme: document
                .global(AUTO_THEME_GLOBAL)
                .is_some_and(|v| v == "true"),
            dark_label: document
                .global(DARK_LABEL_GLOBAL)
                .unwrap_or(defaults.dark_label),
            light_label: document
                .global(LIGHT_LABEL_GLOBAL)
                .unwrap_or(defaults.light_label),
        }
    }
}
