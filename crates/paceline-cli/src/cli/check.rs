//! `pline check-key` -- verify an API key with a live probe call.
//!
//! Reports whether a key is present in the environment (masked), then
//! sends a minimal completion request to confirm the key and endpoint
//! actually work.

use anyhow::Result;
use console::style;
use secrecy::ExposeSecret;

use paceline_infra::llm::{create_provider, probe_provider};
use paceline_infra::secret::{key_env_vars, resolve_api_key};
use paceline_types::config::GlobalConfig;
use paceline_types::llm::ProviderType;

/// Cheap probe model for a provider when none is configured or given.
fn probe_model<'a>(provider: &ProviderType, config: &'a GlobalConfig) -> &'a str {
    match provider {
        // A haiku-class model keeps the probe cheap even when the
        // configured models belong to another provider.
        ProviderType::Anthropic => "claude-3-5-haiku-latest",
        ProviderType::OpenAiCompatible => &config.llm.quick_think_model,
    }
}

/// Handle `pline check-key`.
pub async fn check_key(
    config: &GlobalConfig,
    provider_arg: Option<&str>,
    model_arg: Option<&str>,
    json: bool,
) -> Result<()> {
    let provider_type = match provider_arg {
        Some(s) => s
            .parse::<ProviderType>()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => config.llm.provider.clone(),
    };
    let model = model_arg.unwrap_or_else(|| probe_model(&provider_type, config));

    let Some(api_key) = resolve_api_key(&provider_type) else {
        let vars = key_env_vars(&provider_type).join(" or ");
        if json {
            let out = serde_json::json!({
                "provider": provider_type.to_string(),
                "key_present": false,
                "ok": false,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!();
            println!(
                "  {} No API key found for '{}'",
                style("✗").red().bold(),
                style(provider_type.to_string()).cyan()
            );
            println!("  {}", style(format!("Set {vars} and retry.")).dim());
            println!();
        }
        anyhow::bail!("no API key set for provider '{provider_type}'");
    };

    let key_len = api_key.expose_secret().len();
    let key_prefix: String = api_key.expose_secret().chars().take(8).collect();

    if !json {
        println!();
        println!(
            "  {} API key found (length: {}, starts with: {}…)",
            style("🔑").bold(),
            key_len,
            style(key_prefix).yellow()
        );
        println!(
            "  {} Probing {} with model {}…",
            style("→").bold(),
            style(provider_type.to_string()).cyan(),
            style(model).cyan()
        );
    }

    let provider = create_provider(&config.llm, model, api_key);
    match probe_provider(&provider, model).await {
        Ok(()) => {
            if json {
                let out = serde_json::json!({
                    "provider": provider_type.to_string(),
                    "model": model,
                    "key_present": true,
                    "key_length": key_len,
                    "ok": true,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("  {} API key is valid", style("✓").green().bold());
                println!();
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let out = serde_json::json!({
                    "provider": provider_type.to_string(),
                    "model": model,
                    "key_present": true,
                    "key_length": key_len,
                    "ok": false,
                    "error": err.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "  {} API key test failed: {}",
                    style("✗").red().bold(),
                    err
                );
                println!();
            }
            Err(err.into())
        }
    }
}
