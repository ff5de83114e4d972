//! Persistent host settings (JSON file in the platform data directory).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use medvox_core::EngineConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    pub language: String,
    pub continuous: bool,
    pub speak_confirmations: bool,
    pub history_cap: Option<usize>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            continuous: false,
            speak_confirmations: true,
            history_cap: Some(100),
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.language = self.language.trim().to_string();
        if self.language.is_empty() {
            self.language = "en-US".into();
        }
        self.history_cap = self.history_cap.map(|cap| cap.clamp(1, 10_000));
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            language: self.language.clone(),
            continuous: self.continuous,
            history_cap: self.history_cap,
            speak_confirmations: self.speak_confirmations,
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Meridian Health Labs")
            .join("MedVox")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("medvox")
            .join("settings.json")
    }
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
