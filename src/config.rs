use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translator_config: TranslatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    12600
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

/// Defaults for each console session. None of this persists: every
/// connection starts from these values again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Root URL of the OpenAI-compatible server sessions start on
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model identifier always pinned first in the catalog
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Advisory character cap shown in the counter; input is never blocked
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,
    /// Offered target languages; the first entry is the initial target.
    /// "auto" is offered for the source side only, as a sentinel.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

fn default_api_base() -> String {
    "http://127.0.0.1:1234".to_string()
}

fn default_model() -> String {
    "qwen3-4b".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_char_limit() -> usize {
    5000
}

fn default_languages() -> Vec<String> {
    [
        "English",
        "Chinese",
        "Japanese",
        "Korean",
        "Spanish",
        "French",
        "German",
        "Portuguese",
        "Russian",
        "Arabic",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
            // JSON/JSON-LD; a top-level @context is ignored by serde
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            default_model: default_model(),
            temperature: default_temperature(),
            char_limit: default_char_limit(),
            languages: default_languages(),
        }
    }
}
