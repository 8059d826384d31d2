//! Credential resolution for LLM providers.
//!
//! API keys come from the process environment (optionally seeded from a
//! `.env` file -- see [`crate::config::load_dotenv`]). Nothing here
//! persists or writes secrets.

pub mod env;

pub use env::{key_env_vars, resolve_api_key};
