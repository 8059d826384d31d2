//! Observability setup for Paceline.
//!
//! Owns tracing subscriber initialization (structured logging with
//! optional OpenTelemetry export) and the GenAI span attribute constants
//! used when instrumenting LLM calls.

pub mod genai_attrs;
pub mod tracing_setup;
