//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves stock OpenAI and any
//! backend exposing the same chat completions protocol, via a
//! configurable base URL. Uses [`async_openai`] for type-safe
//! request/response handling.

pub mod config;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, FinishReason,
};
use async_openai::Client;

use paceline_core::llm::provider::LlmProvider;
use paceline_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`. Same defense-in-depth
/// pattern as [`super::anthropic::AnthropicProvider`].
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    /// Create a stock OpenAI provider.
    ///
    /// Uses `https://api.openai.com/v1` as the base URL.
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self::new(config::openai_defaults(api_key, model))
    }

    /// Create a provider against a custom OpenAI-compatible backend URL.
    pub fn custom(base_url: &str, api_key: &str, model: &str) -> Self {
        Self::new(config::custom_defaults(base_url, api_key, model))
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic
    /// [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        // System prompt travels as the first message in this protocol
        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::User | MessageRole::Assistant => {
                    // Assistant history is not replayed by this client;
                    // treat any non-system role as user content.
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
            };
            messages.push(oai_msg);
        }

        // Use the model from the request if set, otherwise fall back to the default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

// OpenAiCompatibleProvider intentionally does NOT derive Debug; see above.

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        // Extract content from the first choice
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let stop_reason = response
            .choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .map(|fr| match fr {
                FinishReason::Length => StopReason::MaxTokens,
                _ => StopReason::EndTurn,
            })
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded"
                || error_type == "rate_limit_error"
                || error_type == "rate_limit_exceeded"
            {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else if error_type == "invalid_request_error" {
                LlmError::InvalidRequest(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => LlmError::AuthenticationFailed,
                    429 => LlmError::RateLimited {
                        retry_after_ms: None,
                    },
                    529 => LlmError::Overloaded(err.to_string()),
                    _ => LlmError::Provider {
                        message: err.to_string(),
                    },
                }
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;
    use paceline_types::llm::Message;

    fn make_provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::openai("sk-test", "gpt-4o-mini")
    }

    #[test]
    fn test_openai_factory() {
        let provider = make_provider();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_build_request_shapes_messages() {
        let provider = make_provider();
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hello".to_string(),
            }],
            system: Some("Be helpful".to_string()),
            max_tokens: 512,
            temperature: Some(0.2),
        };

        let oai_request = provider.build_request(&request);
        assert_eq!(oai_request.model, "gpt-4o-mini");
        // System prompt + one user message
        assert_eq!(oai_request.messages.len(), 2);
        assert!(matches!(
            oai_request.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            oai_request.messages[1],
            ChatCompletionRequestMessage::User(_)
        ));
        assert_eq!(oai_request.max_completion_tokens, Some(512));
        assert_eq!(oai_request.temperature, Some(0.2f32));
    }

    #[test]
    fn test_build_request_model_fallback() {
        let provider = make_provider();
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![],
            system: None,
            max_tokens: 10,
            temperature: None,
        };
        let oai_request = provider.build_request(&request);
        assert_eq!(oai_request.model, "gpt-4o-mini");
    }

    fn api_error(code: Option<&str>, error_type: Option<&str>, message: &str) -> ApiError {
        ApiError {
            message: message.to_string(),
            r#type: error_type.map(str::to_string),
            param: None,
            code: code.map(str::to_string),
        }
    }

    #[test]
    fn test_map_rate_limit_api_error() {
        let err = async_openai::error::OpenAIError::ApiError(api_error(
            Some("rate_limit_exceeded"),
            None,
            "Rate limit reached",
        ));
        assert!(matches!(
            map_openai_error(err),
            LlmError::RateLimited { .. }
        ));
    }

    #[test]
    fn test_map_authentication_api_error() {
        let err = async_openai::error::OpenAIError::ApiError(api_error(
            None,
            None,
            "Incorrect API key provided",
        ));
        assert!(matches!(
            map_openai_error(err),
            LlmError::AuthenticationFailed
        ));
    }

    #[test]
    fn test_map_unknown_api_error_preserves_message() {
        let err = async_openai::error::OpenAIError::ApiError(api_error(
            None,
            Some("server_error"),
            "something exploded",
        ));
        match map_openai_error(err) {
            LlmError::Provider { message } => assert!(message.contains("something exploded")),
            other => panic!("expected Provider, got: {other}"),
        }
    }

    #[test]
    fn test_map_invalid_request_api_error() {
        let err = async_openai::error::OpenAIError::ApiError(api_error(
            None,
            Some("invalid_request_error"),
            "unknown field",
        ));
        assert!(matches!(
            map_openai_error(err),
            LlmError::InvalidRequest(_)
        ));
    }
}
