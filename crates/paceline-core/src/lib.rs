//! Call governance and provider abstractions for Paceline.
//!
//! This crate defines the governors that wrap outbound LLM calls (pacing
//! and retry) and the provider trait the infrastructure layer implements.
//! It depends only on `paceline-types` -- never on HTTP or any IO crate.

pub mod govern;
pub mod llm;
