//! Settings service
//!
//! Persists application settings as JSON in the app data directory.
//! Currently holds the defaults a new catalogue draft starts from.

use crate::config::{
    DEFAULT_COLOR_HEX, DEFAULT_FIELD_NAME, DEFAULT_ICON_NAME, MAX_DEFAULT_FIELDS,
    MAX_FIELD_NAME_LENGTH, MAX_ICON_NAME_LENGTH, SETTINGS_FILENAME,
};
use crate::database::FieldType;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// A field every new catalogue draft starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultField {
    pub name: String,
    pub field_type: FieldType,
}

/// Defaults for the catalogue editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDefaults {
    #[serde(default = "default_icon_name")]
    pub icon_name: String,
    #[serde(default = "default_color_hex")]
    pub color_hex: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<DefaultField>,
}

fn default_icon_name() -> String {
    DEFAULT_ICON_NAME.to_string()
}

fn default_color_hex() -> String {
    DEFAULT_COLOR_HEX.to_string()
}

fn default_fields() -> Vec<DefaultField> {
    vec![DefaultField {
        name: DEFAULT_FIELD_NAME.to_string(),
        field_type: FieldType::Text,
    }]
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            icon_name: default_icon_name(),
            color_hex: default_color_hex(),
            fields: default_fields(),
        }
    }
}

impl EditorDefaults {
    fn validate(&self) -> Result<()> {
        if self.icon_name.trim().is_empty() || self.icon_name.len() > MAX_ICON_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Icon name must be 1-{} characters",
                MAX_ICON_NAME_LENGTH
            )));
        }

        let digits = self
            .color_hex
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .count();
        if !matches!(digits, 3 | 6 | 8) {
            return Err(AppError::Validation(format!(
                "Color must have 3, 6 or 8 hex digits: {}",
                self.color_hex
            )));
        }

        if self.fields.len() > MAX_DEFAULT_FIELDS {
            return Err(AppError::Validation(format!(
                "At most {} default fields are allowed",
                MAX_DEFAULT_FIELDS
            )));
        }

        for field in &self.fields {
            if field.name.trim().is_empty() || field.name.len() > MAX_FIELD_NAME_LENGTH {
                return Err(AppError::Validation(format!(
                    "Field name must be 1-{} characters",
                    MAX_FIELD_NAME_LENGTH
                )));
            }
        }

        Ok(())
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub editor: EditorDefaults,
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(SETTINGS_FILENAME),
        }
    }

    /// Load settings from disk, writing defaults if the file does not exist
    pub async fn load(&self) -> Result<AppSettings> {
        if !fs::try_exists(&self.settings_path).await? {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    pub async fn get_editor_defaults(&self) -> Result<EditorDefaults> {
        Ok(self.load().await?.editor)
    }

    /// Validate and store new editor defaults
    pub async fn update_editor_defaults(&self, editor: EditorDefaults) -> Result<()> {
        editor.validate()?;

        let mut settings = self.load().await?;
        settings.editor = editor;
        self.save(&settings).await
    }
}
