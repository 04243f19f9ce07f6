//! Application settings

use serde::{Deserialize, Serialize};
use shared::DEFAULT_CURRENCY;

use crate::massing::MassingTemplate;

/// Advisor connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorSettings {
    /// Base URL of the advisor server
    pub endpoint: String,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001".to_string(),
        }
    }
}

/// Number display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Decimal places in reports
    pub precision: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Currency for new projects
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Save the live project on exit and restore it on start
    #[serde(default)]
    pub autosave: bool,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub advisor: AdvisorSettings,
    /// Template used by "generate massing"
    #[serde(default)]
    pub template: MassingTemplate,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            autosave: false,
            display: DisplaySettings::default(),
            advisor: AdvisorSettings::default(),
            template: MassingTemplate::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "massing", "massing") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("ignoring unreadable settings file: {e}"),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "massing", "massing") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}
