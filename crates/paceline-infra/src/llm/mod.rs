//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined
//! in `paceline-core`, a provider factory ([`create_provider`]) that
//! constructs the right provider from the configured backend, and a
//! connection smoke test ([`probe_provider`]) used by `pline check-key`.

pub mod anthropic;
pub mod openai_compat;

use secrecy::{ExposeSecret, SecretString};

use paceline_core::llm::box_provider::BoxLlmProvider;
use paceline_types::config::LlmSettings;
use paceline_types::llm::{
    CompletionRequest, LlmError, Message, MessageRole, ProviderType,
};

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for the configured backend.
///
/// # Arguments
///
/// * `settings` - LLM backend selection (provider type + base URL override)
/// * `model` - Default model identifier for the provider
/// * `api_key` - The resolved API key (already fetched from the environment)
pub fn create_provider(
    settings: &LlmSettings,
    model: &str,
    api_key: SecretString,
) -> BoxLlmProvider {
    match settings.provider {
        ProviderType::Anthropic => {
            let mut provider = AnthropicProvider::new(api_key, model.to_string());
            if let Some(ref base_url) = settings.backend_url {
                provider = provider.with_base_url(base_url.clone());
            }
            BoxLlmProvider::new(provider)
        }
        ProviderType::OpenAiCompatible => {
            let provider = match settings.backend_url.as_deref() {
                Some(base_url) => OpenAiCompatibleProvider::custom(
                    base_url,
                    api_key.expose_secret(),
                    model,
                ),
                None => OpenAiCompatibleProvider::openai(api_key.expose_secret(), model),
            };
            BoxLlmProvider::new(provider)
        }
    }
}

/// Test provider connectivity by sending a minimal completion request.
///
/// Used by `pline check-key` to verify the API key and endpoint are
/// working. Sends a tiny "Hello" message with minimal token budget.
///
/// # Errors
///
/// Returns the LLM error if the provider fails to respond.
pub async fn probe_provider(
    provider: &BoxLlmProvider,
    model: &str,
) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message {
            role: MessageRole::User,
            content: "Hello".to_string(),
        }],
        system: None,
        max_tokens: 10,
        temperature: Some(0.0),
    };
    provider.complete(&request).await?;
    Ok(())
}
