//! User settings for kasboek
//!
//! Manages user preferences including currency display, date format, and
//! the transaction classifier configuration.

use serde::{Deserialize, Serialize};

use super::paths::KasboekPaths;
use crate::error::KasboekError;

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Whether the remote classifier may be used at all. The local heuristic
    /// is always available.
    #[serde(default = "default_true")]
    pub remote_enabled: bool,

    /// Model name sent to the completion endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum number of labelled examples included in the prompt and
    /// consulted by the heuristic
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            remote_enabled: true,
            model: default_model(),
            api_base: default_api_base(),
            temperature: default_temperature(),
            max_examples: default_max_examples(),
        }
    }
}

/// User settings for kasboek
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Classifier configuration
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_max_examples() -> usize {
    12
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            classifier: ClassifierSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &KasboekPaths) -> Result<Self, KasboekError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| KasboekError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                KasboekError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &KasboekPaths) -> Result<(), KasboekError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| KasboekError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| KasboekError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
