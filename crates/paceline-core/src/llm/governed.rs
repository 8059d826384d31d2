//! GovernedClient -- an LLM provider with call governance applied.
//!
//! This is the seam where the embedding application honors the
//! `enabled` master switch: when rate limiting is off, requests go to
//! the provider directly; when on, every call flows through the pacing
//! gate and the retry loop.

use paceline_types::config::RateLimitSettings;
use paceline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::govern::CallGovernor;

use super::box_provider::BoxLlmProvider;

/// A provider paired with an optional call governor.
pub struct GovernedClient {
    provider: BoxLlmProvider,
    governor: Option<CallGovernor>,
}

impl GovernedClient {
    /// Wrap a provider according to the configured governance knobs.
    pub fn new(provider: BoxLlmProvider, settings: &RateLimitSettings) -> Self {
        let governor = settings
            .enabled
            .then(|| CallGovernor::from_settings(settings));
        Self { provider, governor }
    }

    /// Wrap a provider with no governance at all.
    pub fn ungoverned(provider: BoxLlmProvider) -> Self {
        Self {
            provider,
            governor: None,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Whether calls are governed (pacing/retry) or passed straight through.
    pub fn is_governed(&self) -> bool {
        self.governor.is_some()
    }

    /// Send a completion request through the governor (when present).
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        match &self.governor {
            Some(governor) => {
                governor
                    .execute(|| self.provider.complete(request))
                    .await
            }
            None => self.provider.complete(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use paceline_types::llm::{Message, MessageRole, StopReason, Usage};
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    // --- Mock provider ---

    #[derive(Clone)]
    enum MockOutcome {
        Success,
        RateLimited(Option<u64>),
        Auth,
    }

    struct MockProvider {
        name: String,
        /// Outcomes consumed per call; once empty, every call succeeds.
        script: Mutex<VecDeque<MockOutcome>>,
        calls: AtomicU32,
    }

    impl MockProvider {
        fn scripted(name: &str, script: Vec<MockOutcome>) -> Self {
            Self {
                name: name.to_string(),
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn response(name: &str) -> CompletionResponse {
            CompletionResponse {
                id: format!("resp-{name}"),
                content: format!("Hello from {name}"),
                model: format!("{name}-model"),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(MockOutcome::Success);
            let name = self.name.clone();
            async move {
                match outcome {
                    MockOutcome::Success => Ok(MockProvider::response(&name)),
                    MockOutcome::RateLimited(retry_after_ms) => {
                        Err(LlmError::RateLimited { retry_after_ms })
                    }
                    MockOutcome::Auth => Err(LlmError::AuthenticationFailed),
                }
            }
        }
    }

    fn settings(enabled: bool) -> RateLimitSettings {
        RateLimitSettings {
            enabled,
            calls_per_minute: 30,
            max_retries: 3,
            base_delay_ms: 1000,
            max_tokens_per_call: 1000,
        }
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hello".to_string(),
            }],
            system: None,
            max_tokens: 100,
            temperature: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_governed_success_passes_through() {
        let provider = BoxLlmProvider::new(MockProvider::scripted("mock", vec![]));
        let client = GovernedClient::new(provider, &settings(true));

        assert!(client.is_governed());
        let response = client.complete(&test_request()).await.unwrap();
        assert_eq!(response.content, "Hello from mock");
    }

    #[tokio::test(start_paused = true)]
    async fn test_governed_retries_rate_limits_until_success() {
        let mock = MockProvider::scripted(
            "mock",
            vec![
                MockOutcome::RateLimited(None),
                MockOutcome::RateLimited(None),
            ],
        );
        let provider = BoxLlmProvider::new(mock);
        let client = GovernedClient::new(provider, &settings(true));

        let start = Instant::now();
        let response = client.complete(&test_request()).await.unwrap();
        assert_eq!(response.content, "Hello from mock");
        // Two backoffs plus re-pacing: the recovery took real (virtual) time.
        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_governed_does_not_retry_fatal_errors() {
        let mock = MockProvider::scripted("mock", vec![MockOutcome::Auth]);
        let provider = BoxLlmProvider::new(mock);
        let client = GovernedClient::new(provider, &settings(true));

        let result = client.complete(&test_request()).await;
        assert!(matches!(
            result.unwrap_err(),
            LlmError::AuthenticationFailed
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_settings_bypass_governance() {
        let mock = MockProvider::scripted("mock", vec![MockOutcome::RateLimited(None)]);
        let provider = BoxLlmProvider::new(mock);
        let client = GovernedClient::new(provider, &settings(false));

        assert!(!client.is_governed());
        let start = Instant::now();
        let result = client.complete(&test_request()).await;

        // One call, no retry, no delay: the failure surfaces as-is.
        assert!(matches!(
            result.unwrap_err(),
            LlmError::RateLimited { .. }
        ));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_governed_calls_are_paced() {
        let provider = BoxLlmProvider::new(MockProvider::scripted("mock", vec![]));
        let client = GovernedClient::new(provider, &settings(true));

        let start = Instant::now();
        client.complete(&test_request()).await.unwrap();
        client.complete(&test_request()).await.unwrap();

        // Second call waited out the 2s minimum interval.
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_provider_name_passthrough() {
        let provider = BoxLlmProvider::new(MockProvider::scripted("anthropic", vec![]));
        let client = GovernedClient::ungoverned(provider);
        assert_eq!(client.provider_name(), "anthropic");
    }
}
