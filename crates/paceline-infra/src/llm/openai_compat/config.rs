//! Configuration and defaults for OpenAI-compatible providers.
//!
//! One provider implementation speaks to any backend exposing the OpenAI
//! chat completions protocol; the configuration picks the base URL.

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Default model identifier (e.g., "gpt-4o-mini").
    pub model: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
    }
}

/// Configuration for a custom OpenAI-compatible backend URL.
pub fn custom_defaults(base_url: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: base_url.into(),
        api_key: api_key.into(),
        model: model.into(),
    }
}
