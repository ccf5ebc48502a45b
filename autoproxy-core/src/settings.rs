//! Settings - User Preferences for Render Planning
//!
//! Every field has a default, so an empty JSON object is a valid settings file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::validation::FailureMode;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "psd", "tif"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported output extension: {0}")]
    UnsupportedExtension(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Template to use instead of the class default, where it applies.
    #[serde(default)]
    pub preferred_template: Option<String>,
    #[serde(default)]
    pub remove_flavour_text: bool,
    #[serde(default)]
    pub remove_reminder_text: bool,
    #[serde(default = "default_extension")]
    pub file_extension: String,
    #[serde(default)]
    pub failure_mode: FailureMode,
}

fn default_extension() -> String { "png".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            preferred_template: None,
            remove_flavour_text: false,
            remove_reminder_text: false,
            file_extension: default_extension(),
            failure_mode: FailureMode::Block,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.file_extension = settings.file_extension.trim_start_matches('.').to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&settings.file_extension.as_str()) {
            return Err(SettingsError::UnsupportedExtension(settings.file_extension));
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
