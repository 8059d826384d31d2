//! LlmProvider trait definition.
//!
//! This is the abstraction the governors' operations are built from.
//! Uses RPITIT for `complete`; implementations live in paceline-infra
//! (e.g., `AnthropicProvider`).

use paceline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Anthropic, OpenAI-compatible, etc.).
///
/// Implementations perform the actual network call and are responsible
/// for classifying provider failures into the typed [`LlmError`]
/// taxonomy -- in particular, producing `RateLimited` from HTTP 429 so
/// the retry governor never has to inspect error text.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
