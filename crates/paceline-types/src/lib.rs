//! Shared domain types for Paceline.
//!
//! This crate contains the provider-agnostic LLM request/response types,
//! the typed error taxonomy, and the configuration surface consumed by the
//! call governors. Zero infrastructure dependencies -- only serde and
//! thiserror.

pub mod config;
pub mod llm;
