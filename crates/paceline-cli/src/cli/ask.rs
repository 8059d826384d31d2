//! `pline ask` -- send one governed prompt and print the response.
//!
//! The full stack end to end: key resolution, provider construction,
//! call governance (pacing + retry per the configured knobs), and a
//! GenAI-instrumented span around the completion.

use anyhow::{Context, Result};
use console::style;
use tracing::Instrument;

use paceline_core::llm::governed::GovernedClient;
use paceline_infra::llm::create_provider;
use paceline_infra::secret::{key_env_vars, resolve_api_key};
use paceline_observe::genai_attrs::{
    GEN_AI_OPERATION_NAME, GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MAX_TOKENS, GEN_AI_REQUEST_MODEL,
    GEN_AI_USAGE_INPUT_TOKENS, GEN_AI_USAGE_OUTPUT_TOKENS, OP_CHAT,
};
use paceline_types::config::GlobalConfig;
use paceline_types::llm::{CompletionRequest, Message, MessageRole};

/// Handle `pline ask`.
pub async fn ask(
    config: &GlobalConfig,
    prompt: &str,
    deep: bool,
    model_override: Option<&str>,
    json: bool,
) -> Result<()> {
    let model = model_override.unwrap_or(if deep {
        &config.llm.deep_think_model
    } else {
        &config.llm.quick_think_model
    });

    let api_key = resolve_api_key(&config.llm.provider).with_context(|| {
        format!(
            "no API key set for provider '{}' (set {})",
            config.llm.provider,
            key_env_vars(&config.llm.provider).join(" or ")
        )
    })?;

    let provider = create_provider(&config.llm, model, api_key);
    let client = GovernedClient::new(provider, &config.rate_limit);

    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message {
            role: MessageRole::User,
            content: prompt.to_string(),
        }],
        system: None,
        max_tokens: config.rate_limit.max_tokens_per_call,
        temperature: None,
    };

    let span = tracing::info_span!(
        "chat",
        { GEN_AI_OPERATION_NAME } = OP_CHAT,
        { GEN_AI_PROVIDER_NAME } = client.provider_name(),
        { GEN_AI_REQUEST_MODEL } = model,
        { GEN_AI_REQUEST_MAX_TOKENS } = request.max_tokens,
        { GEN_AI_USAGE_INPUT_TOKENS } = tracing::field::Empty,
        { GEN_AI_USAGE_OUTPUT_TOKENS } = tracing::field::Empty,
    );

    let response = client
        .complete(&request)
        .instrument(span.clone())
        .await
        .context("completion request failed")?;

    span.record(GEN_AI_USAGE_INPUT_TOKENS, response.usage.input_tokens);
    span.record(GEN_AI_USAGE_OUTPUT_TOKENS, response.usage.output_tokens);

    if json {
        let out = serde_json::json!({
            "provider": client.provider_name(),
            "model": response.model,
            "content": response.content,
            "stop_reason": response.stop_reason.to_string(),
            "usage": {
                "input_tokens": response.usage.input_tokens,
                "output_tokens": response.usage.output_tokens,
            },
            "governed": client.is_governed(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", response.content);
    println!();
    println!(
        "  {}",
        style(format!(
            "{} · {} · {} in / {} out tokens{}",
            client.provider_name(),
            response.model,
            response.usage.input_tokens,
            response.usage.output_tokens,
            if client.is_governed() { "" } else { " · ungoverned" }
        ))
        .dim()
    );
    println!();

    Ok(())
}
