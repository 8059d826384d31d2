//! `pline config` -- show the resolved configuration and key availability.
//!
//! Prints the effective settings (file values merged with defaults) and
//! which API key environment variables are currently set. Key values are
//! never printed, only presence.

use anyhow::Result;
use console::style;

use paceline_types::config::GlobalConfig;

/// Environment variables reported in the key availability section.
const KEY_VARS: &[&str] = &["PACELINE_API_KEY", "ANTHROPIC_API_KEY", "OPENAI_API_KEY"];

/// Handle `pline config`.
pub fn show_config(config: &GlobalConfig, json: bool) -> Result<()> {
    let keys_set: Vec<(&str, bool)> = KEY_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).map_or(false, |v| !v.is_empty())))
        .collect();

    if json {
        let out = serde_json::json!({
            "llm": {
                "provider": config.llm.provider.to_string(),
                "deep_think_model": config.llm.deep_think_model,
                "quick_think_model": config.llm.quick_think_model,
                "backend_url": config.llm.backend_url,
            },
            "rate_limit": {
                "enabled": config.rate_limit.enabled,
                "calls_per_minute": config.rate_limit.calls_per_minute,
                "max_retries": config.rate_limit.max_retries,
                "base_delay_ms": config.rate_limit.base_delay_ms,
                "max_tokens_per_call": config.rate_limit.max_tokens_per_call,
            },
            "api_keys": keys_set
                .iter()
                .map(|(name, set)| (name.to_string(), serde_json::Value::Bool(*set)))
                .collect::<serde_json::Map<String, serde_json::Value>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("LLM backend").bold());
    println!("    Provider:          {}", style(&config.llm.provider).cyan());
    println!("    Deep think model:  {}", config.llm.deep_think_model);
    println!("    Quick think model: {}", config.llm.quick_think_model);
    println!(
        "    Backend URL:       {}",
        config
            .llm
            .backend_url
            .as_deref()
            .unwrap_or("(provider default)")
    );
    println!();

    println!("  {}", style("Call governance").bold());
    if config.rate_limit.enabled {
        println!(
            "    {} enabled: {} calls/min, {} retries, {} ms base delay",
            style("✓").green(),
            config.rate_limit.calls_per_minute,
            config.rate_limit.max_retries,
            config.rate_limit.base_delay_ms
        );
    } else {
        println!("    {} disabled: calls go to the provider ungoverned", style("✗").red());
    }
    println!(
        "    Max tokens per call: {}",
        config.rate_limit.max_tokens_per_call
    );
    println!();

    println!("  {}", style("API keys").bold());
    for (name, set) in &keys_set {
        let mark = if *set {
            style("✓ set").green().to_string()
        } else {
            style("✗ not set").red().to_string()
        };
        println!("    {name}: {mark}");
    }
    println!();

    Ok(())
}
