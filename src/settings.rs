//! Settings management for the overlay designer server
//!
//! Settings live in an XML file under the platform config directory. A
//! missing or unreadable file means defaults.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name under the platform config dir
const APP_DIR: &str = "OverlayFx";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "OverlayFxSettings")]
pub struct ServerSettings {
    /// Port the HTTP API listens on
    #[serde(rename = "apiPort", default = "default_api_port")]
    pub api_port: u16,

    /// Directory holding `.json` effect descriptors
    #[serde(rename = "fxDir", default = "default_fx_dir")]
    pub fx_dir: String,

    /// Catalog file listing effects to load; builtins when absent
    #[serde(rename = "catalogPath", default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,

    /// Directory for saved design templates
    #[serde(rename = "templatesDir", default = "default_templates_dir")]
    pub templates_dir: String,

    /// Log filter used when no environment override is set
    #[serde(rename = "logLevel", default = "default_log_level")]
    pub log_level: String,

    #[serde(rename = "logJson", default)]
    pub log_json: bool,

    #[serde(rename = "logFile", default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_api_port() -> u16 {
    8090
}

fn default_fx_dir() -> String {
    "fx".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            fx_dir: default_fx_dir(),
            catalog_path: None,
            templates_dir: default_templates_dir(),
            log_level: default_log_level(),
            log_json: false,
            log_file: None,
        }
    }
}

impl ServerSettings {
    /// `<config_dir>/OverlayFx/settings.xml`
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_DIR);
            p.push("settings.xml");
            p
        })
    }

    /// Load from the config directory, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        let mut settings: Self = from_str(&contents)?;
        if settings.api_port == 0 {
            settings.api_port = default_api_port();
        }
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to_file(&path)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let xml = to_string(self)?;
        let formatted = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml);
        fs::write(path, formatted)?;
        Ok(())
    }
}

/// Settings-related errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),
    #[error("Could not find config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ServerSettings::default();
        assert_eq!(settings.api_port, 8090);
        assert_eq!(settings.fx_dir, "fx");
        assert!(settings.catalog_path.is_none());
        assert_eq!(settings.log_level, "info");
        assert!(!settings.log_json);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.xml");

        let settings = ServerSettings {
            api_port: 9100,
            catalog_path: Some("fx/catalog.json".to_string()),
            log_json: true,
            ..ServerSettings::default()
        };
        settings.save_to_file(&path).unwrap();

        let loaded = ServerSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(&path, "<OverlayFxSettings><apiPort>7000</apiPort></OverlayFxSettings>").unwrap();

        let loaded = ServerSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded.api_port, 7000);
        assert_eq!(loaded.templates_dir, "templates");
        assert!(loaded.log_file.is_none());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(&path, "<OverlayFxSettings><apiPort>nope</apiPort>").unwrap();
        assert!(ServerSettings::load_from_file(&path).is_err());
    }
}
