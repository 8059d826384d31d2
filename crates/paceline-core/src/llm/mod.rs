//! LLM provider abstractions for Paceline.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `GovernedClient`: a provider with call governance applied

pub mod box_provider;
pub mod governed;
pub mod provider;
