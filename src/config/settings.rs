//! Configuration settings for Samtale.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub transcription: TranscriptionSettings,
    pub streaming: StreamingSettings,
    pub team: TeamSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory for saved transcripts and analysis output.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.samtale".to_string(),
            output_dir: "output".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (qdrant, memory).
    pub provider: String,
    /// Server URL (qdrant provider). Overridable via QDRANT_URL.
    pub url: String,
    /// API key (qdrant provider). Overridable via QDRANT_API_KEY.
    pub api_key: Option<String>,
    /// Default collection name.
    pub collection: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "qdrant".to_string(),
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "Default".to_string(),
        }
    }
}

/// File transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model for file transcription.
    pub model: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
        }
    }
}

/// Realtime streaming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    /// Websocket endpoint of the streaming speech service.
    pub endpoint: String,
    /// Audio sample rate in Hz.
    pub sample_rate: u32,
    /// Ask the service to format turns.
    pub format_turns: bool,
    /// Quiet period (seconds) that ends an utterance.
    pub pause_duration_seconds: f64,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            endpoint: "wss://streaming.assemblyai.com/v3/ws".to_string(),
            sample_rate: 16000,
            format_turns: true,
            pause_duration_seconds: 3.0,
        }
    }
}

impl StreamingSettings {
    /// The utterance pause as a [`Duration`].
    pub fn pause_duration(&self) -> Duration {
        Duration::from_secs_f64(self.pause_duration_seconds.max(0.1))
    }
}

/// Analysis team settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSettings {
    /// LLM model for team analysis.
    pub model: String,
    /// Maximum tool-calling iterations per run.
    pub max_iterations: usize,
    /// Maximum knowledge documents pulled into context.
    pub max_context_documents: usize,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            max_iterations: 15,
            max_context_documents: 5,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SamtaleError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("samtale")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Path of the conversation memory database.
    pub fn memory_db_path(&self) -> PathBuf {
        self.data_dir().join("memory.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.vector_store.provider, "qdrant");
        assert_eq!(settings.vector_store.collection, "Default");
        assert_eq!(settings.embedding.dimensions, 1536);
        assert_eq!(settings.streaming.sample_rate, 16000);
        assert_eq!(settings.streaming.pause_duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_toml_round_trip() {
        let toml_str = r#"
            [streaming]
            pause_duration_seconds = 1.5

            [vector_store]
            collection = "Research"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.streaming.pause_duration(), Duration::from_millis(1500));
        assert_eq!(settings.vector_store.collection, "Research");
        // Untouched sections keep their defaults.
        assert_eq!(settings.team.model, "gpt-4.1");
    }
}
