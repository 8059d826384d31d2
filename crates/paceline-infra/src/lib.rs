//! Infrastructure layer for Paceline.
//!
//! Concrete implementations of the abstractions defined in
//! `paceline-core`: HTTP LLM providers (Anthropic, OpenAI-compatible),
//! configuration loading, and environment-based credential resolution.

pub mod config;
pub mod llm;
pub mod secret;
