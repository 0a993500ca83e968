//! Markup contract configuration.
//!
//! [`ThemeConfig`] names every attribute, class, and custom-property prefix the
//! engine reads from or writes to the host document, plus the variant and the
//! storage key. Every field has a default, so a config file only needs to list
//! what differs:
//!
//! ```yaml
//! variant: binary
//! dark-class: theme-dark
//! storage-key: site-theme
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::mode::{Appearance, ThemeMode, Variant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThemeConfig {
    pub variant: Variant,
    /// Attribute holding the comma-separated variable names.
    pub declaration_attribute: String,
    /// Prefix of the light custom property; also the property written on apply.
    pub light_prefix: String,
    /// Prefix of the optional dark override custom property.
    pub dark_prefix: String,
    /// Class toggled on the root element while dark is active.
    pub dark_class: String,
    /// Marker class for source-switching assets.
    pub asset_class: String,
    pub light_src_attribute: String,
    pub dark_src_attribute: String,
    pub light_srcset_attribute: String,
    pub dark_srcset_attribute: String,
    /// Elements visible only in dark mode.
    pub dark_asset_class: String,
    /// Elements visible only in light mode.
    pub light_asset_class: String,
    pub hidden_class: String,
    pub system_control_attribute: String,
    pub light_control_attribute: String,
    pub dark_control_attribute: String,
    /// Generic toggle used by the binary variant.
    pub toggle_attribute: String,
    pub active_class: String,
    pub storage_key: String,
    /// Lower-case tag names treated as vector-animation players.
    pub player_tags: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            variant: Variant::TriState,
            declaration_attribute: "data-theme-variables".to_string(),
            light_prefix: "--color--".to_string(),
            dark_prefix: "--dark--".to_string(),
            dark_class: "dark".to_string(),
            asset_class: "theme-asset".to_string(),
            light_src_attribute: "data-light-src".to_string(),
            dark_src_attribute: "data-dark-src".to_string(),
            light_srcset_attribute: "data-light-srcset".to_string(),
            dark_srcset_attribute: "data-dark-srcset".to_string(),
            dark_asset_class: "dark-asset".to_string(),
            light_asset_class: "light-asset".to_string(),
            hidden_class: "hidden".to_string(),
            system_control_attribute: "data-theme-system".to_string(),
            light_control_attribute: "data-theme-light".to_string(),
            dark_control_attribute: "data-theme-dark".to_string(),
            toggle_attribute: "data-theme-toggle".to_string(),
            active_class: "active".to_string(),
            storage_key: "theme".to_string(),
            player_tags: vec!["lottie-player".to_string(), "dotlottie-player".to_string()],
        }
    }
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the config with a different variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config file, choosing the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        match extension(path).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(ThemeError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Custom property holding the light value of `name`.
    pub fn light_property(&self, name: &str) -> String {
        format!("{}{}", self.light_prefix, name)
    }

    /// Custom property holding the dark override of `name`.
    pub fn dark_property(&self, name: &str) -> String {
        format!("{}{}", self.dark_prefix, name)
    }

    pub fn src_attribute(&self, appearance: Appearance) -> &str {
        match appearance {
            Appearance::Light => &self.light_src_attribute,
            Appearance::Dark => &self.dark_src_attribute,
        }
    }

    pub fn srcset_attribute(&self, appearance: Appearance) -> &str {
        match appearance {
            Appearance::Light => &self.light_srcset_attribute,
            Appearance::Dark => &self.dark_srcset_attribute,
        }
    }

    /// Marker attribute of the tri-state control for `mode`.
    pub fn control_attribute(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::System => &self.system_control_attribute,
            ThemeMode::Light => &self.light_control_attribute,
            ThemeMode::Dark => &self.dark_control_attribute,
        }
    }

    pub fn is_player_tag(&self, tag: &str) -> bool {
        self.player_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
