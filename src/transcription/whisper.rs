//! One-shot file transcription via the OpenAI Whisper API.

use crate::error::{Result, SamtaleError};
use crate::openai::create_client;
use async_openai::types::CreateTranscriptionRequestArgs;
use std::path::Path;
use tracing::{debug, instrument};

/// Whisper-based transcriber for local audio files.
pub struct FileTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl FileTranscriber {
    /// Create a transcriber for the given Whisper model.
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }

    /// Transcribe an audio file and return the plain transcript text.
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    pub async fn transcribe_file(&self, audio_path: &Path) -> Result<String> {
        if !audio_path.is_file() {
            return Err(SamtaleError::InvalidInput(format!(
                "Audio file '{}' not found",
                audio_path.display()
            )));
        }

        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .build()
            .map_err(|e| SamtaleError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| SamtaleError::OpenAI(format!("Whisper API error: {}", e)))?;

        debug!("Transcribed {} characters", response.text.len());
        Ok(response.text.trim().to_string())
    }
}

impl Default for FileTranscriber {
    fn default() -> Self {
        Self::new("whisper-1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_distinct_error() {
        let transcriber = FileTranscriber::default();
        let err = transcriber
            .transcribe_file(Path::new("/does/not/exist.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SamtaleError::InvalidInput(_)));
    }
}
