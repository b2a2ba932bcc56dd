//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are present before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, SamtaleError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Team analysis requires the LLM API key.
    Analyze,
    /// Voice conversation requires the LLM and speech API keys.
    Converse,
    /// Streaming transcription requires the speech API key.
    Stream,
    /// File transcription requires the LLM API key (Whisper).
    Transcribe,
    /// Ingestion and retrieval require the LLM API key (embeddings).
    Knowledge,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Analyze | Operation::Transcribe | Operation::Knowledge => {
            check_env("OPENAI_API_KEY")?;
        }
        Operation::Stream => {
            check_env("ASSEMBLYAI_API_KEY")?;
        }
        Operation::Converse => {
            check_env("OPENAI_API_KEY")?;
            check_env("ASSEMBLYAI_API_KEY")?;
        }
    }
    Ok(())
}

/// Check that an environment variable is set and non-empty.
fn check_env(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(()),
        _ => Err(SamtaleError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_env_reports_missing_variable() {
        let err = check_env("SAMTALE_TEST_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, SamtaleError::Config(_)));
    }
}
