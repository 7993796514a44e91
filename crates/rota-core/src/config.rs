use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Rota application.
///
/// Loaded from `~/.rota/config.toml` by default. Each section corresponds
/// to a collaborator or cross-cutting concern. Secrets may be left out of
/// the file and supplied via environment variables instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub epr: EprConfig,
    #[serde(default)]
    pub azure_openai: AzureOpenAiConfig,
    #[serde(default)]
    pub azure_speech: AzureSpeechConfig,
}

impl Default for RotaConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            epr: EprConfig::default(),
            azure_openai: AzureOpenAiConfig::default(),
            azure_speech: AzureSpeechConfig::default(),
        }
    }
}

impl RotaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RotaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Port for the REST API server.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3040,
        }
    }
}

/// Record store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EprConfig {
    /// Backend tag: epic, cerner, tpp, emis, or manual.
    pub system: String,
}

impl Default for EprConfig {
    fn default() -> Self {
        Self {
            system: "manual".to_string(),
        }
    }
}

/// Azure OpenAI generative client settings.
///
/// `api_key` and `endpoint` may be omitted here and supplied through
/// `AZURE_OPENAI_API_KEY` / `AZURE_OPENAI_ENDPOINT`; with neither present
/// the client reports not-ready and the pipeline runs in degraded mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureOpenAiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub deployment: String,
    pub api_version: String,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: "gpt-4o".to_string(),
            api_version: "2024-08-01-preview".to_string(),
        }
    }
}

/// Azure Speech TTS settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSpeechConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub region: String,
    /// Neural voice name used for SSML synthesis.
    pub voice: String,
}

impl Default for AzureSpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: "uksouth".to_string(),
            voice: "en-GB-RyanNeural".to_string(),
        }
    }
}
