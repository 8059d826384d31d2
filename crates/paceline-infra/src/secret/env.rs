//! Environment variable API key resolution.
//!
//! Key resolution order:
//! - `PACELINE_API_KEY` -- explicit override, checked first
//! - the provider-canonical variable (`ANTHROPIC_API_KEY` or
//!   `OPENAI_API_KEY`)
//!
//! Values are wrapped in [`SecretString`] immediately so they never end
//! up in Debug output or logs.

use secrecy::SecretString;

use paceline_types::llm::ProviderType;

/// Generic override variable, checked before provider-specific names.
const OVERRIDE_VAR: &str = "PACELINE_API_KEY";

/// The environment variable names consulted for a provider, in order.
pub fn key_env_vars(provider: &ProviderType) -> &'static [&'static str] {
    match provider {
        ProviderType::Anthropic => &[OVERRIDE_VAR, "ANTHROPIC_API_KEY"],
        ProviderType::OpenAiCompatible => &[OVERRIDE_VAR, "OPENAI_API_KEY"],
    }
}

/// Resolve the API key for a provider from the environment.
///
/// Returns `None` when no variable is set. A variable that exists but
/// holds invalid Unicode is treated as not found rather than erroring,
/// since API keys must be valid strings.
pub fn resolve_api_key(provider: &ProviderType) -> Option<SecretString> {
    for name in key_env_vars(provider) {
        match std::env::var(name) {
            Ok(val) if !val.is_empty() => return Some(SecretString::from(val)),
            Ok(_) => {}
            Err(std::env::VarError::NotPresent) => {}
            Err(std::env::VarError::NotUnicode(_)) => {}
        }
    }
    None
}
