//! LLM provider factory.
//!
//! Creates the generation backend from the application's `LlmSettings`,
//! resolving the provider, endpoint, credentials and timeout.

use crate::client::LlmClient;
use crate::providers::{ollama, openai, OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use getnote_core::{AppError, AppResult, LlmSettings};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client from settings.
///
/// # Errors
/// Returns `AppError::Config` if:
/// - Provider is unknown
/// - Required secrets are missing
/// - The HTTP client cannot be built
pub fn create_client(settings: &LlmSettings) -> AppResult<Arc<dyn LlmClient>> {
    let provider = ProviderType::parse(&settings.provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", settings.provider)))?;
    let timeout = Duration::from_secs(settings.timeout_secs);

    tracing::debug!(
        "Creating {} client (model: {}, timeout: {:?})",
        provider.as_str(),
        settings.model,
        timeout
    );

    match provider {
        ProviderType::Ollama => {
            let base_url = settings
                .endpoint
                .as_deref()
                .unwrap_or(ollama::DEFAULT_OLLAMA_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url, timeout)?))
        }
        ProviderType::OpenAI => {
            let api_key = settings.api_key.as_deref().ok_or_else(|| {
                AppError::Config("OpenAI provider requires API key".to_string())
            })?;
            let base_url = settings
                .endpoint
                .as_deref()
                .unwrap_or(openai::DEFAULT_OPENAI_URL);
            Ok(Arc::new(OpenAiClient::new(base_url, api_key, timeout)?))
        }
    }
}
