//! Anthropic Claude LLM provider implementation.
//!
//! This module provides the [`AnthropicProvider`] which implements the
//! [`LlmProvider`](paceline_core::llm::provider::LlmProvider) trait for
//! the Anthropic Messages API.

pub mod client;
pub mod types;

pub use client::AnthropicProvider;
