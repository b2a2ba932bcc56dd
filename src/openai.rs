//! Shared OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client with a request timeout.
///
/// Team analyses can run long; `SAMTALE_LLM_TIMEOUT_SECS` raises the limit
/// without touching the config file.
pub fn create_client() -> Client<OpenAIConfig> {
    create_client_with_timeout(Duration::from_secs(configured_timeout_secs()))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

fn configured_timeout_secs() -> u64 {
    std::env::var("SAMTALE_LLM_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        // Without the override, the default applies.
        if std::env::var("SAMTALE_LLM_TIMEOUT_SECS").is_err() {
            assert_eq!(configured_timeout_secs(), DEFAULT_TIMEOUT_SECS);
        }
    }
}
