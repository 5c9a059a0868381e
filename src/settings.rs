use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, YnaiError};
use crate::ynab::DEFAULT_API_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_token_file")]
    pub token_file: String,
    /// Budget to select when `--budget` is not given.
    #[serde(default)]
    pub budget: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_file() -> String {
    "token".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_file: default_token_file(),
            budget: None,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ynai")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

/// Read the API token, trimmed. The buffer is wiped on drop.
pub fn load_token(path: &Path) -> Result<Zeroizing<String>> {
    let raw = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        YnaiError::Settings(format!("Token file '{}' could not be read: {e}", path.display()))
    })?);
    let token = Zeroizing::new(raw.trim().to_string());
    if token.is_empty() {
        return Err(YnaiError::Settings(format!(
            "Token file '{}' is empty",
            path.display()
        )));
    }
    Ok(token)
}
