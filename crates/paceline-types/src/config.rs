//! Global configuration types for Paceline.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls
//! which LLM backend is used and how outbound calls are governed. All
//! fields have defaults, so an empty (or missing) file yields a working
//! configuration.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration for Paceline.
///
/// Loaded from `~/.paceline/config.toml`. All fields have defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// LLM backend selection and model table.
    #[serde(default)]
    pub llm: LlmSettings,

    /// Call governance knobs (pacing + retry).
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

/// LLM backend selection and default model table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Which provider backend to use.
    #[serde(default = "default_provider")]
    pub provider: ProviderType,

    /// Model for slow, high-quality reasoning calls.
    #[serde(default = "default_deep_think_model")]
    pub deep_think_model: String,

    /// Model for fast, cheap calls.
    #[serde(default = "default_quick_think_model")]
    pub quick_think_model: String,

    /// Override the provider's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

fn default_provider() -> ProviderType {
    ProviderType::OpenAiCompatible
}

fn default_deep_think_model() -> String {
    "o4-mini".to_string()
}

fn default_quick_think_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            deep_think_model: default_deep_think_model(),
            quick_think_model: default_quick_think_model(),
            backend_url: None,
        }
    }
}

/// Knobs for the call governors.
///
/// `max_tokens_per_call` is informational for request construction -- the
/// governors never enforce it; it caps the `max_tokens` field of requests
/// the application builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Master switch: when false, calls go to the provider ungoverned.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minimum-interval pacing: at most this many call starts per minute.
    /// Zero disables the pacing gate (retry still applies).
    #[serde(default = "default_calls_per_minute")]
    pub calls_per_minute: u32,

    /// Retry budget for rate-limited failures (attempts = max_retries + 1).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles per retry attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Token budget applied to each request the application constructs.
    #[serde(default = "default_max_tokens_per_call")]
    pub max_tokens_per_call: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_calls_per_minute() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_tokens_per_call() -> u32 {
    1000
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            calls_per_minute: default_calls_per_minute(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_tokens_per_call: default_max_tokens_per_call(),
        }
    }
}
