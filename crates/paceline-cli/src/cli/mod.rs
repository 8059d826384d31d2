//! CLI command definitions and dispatch for the `pline` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod check;
pub mod config;

use clap::{Parser, Subcommand};

/// Governed calls to rate-limited LLM APIs.
#[derive(Parser)]
#[command(name = "pline", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans via OpenTelemetry (stdout exporter, local development).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify an API key with a live probe call to the provider.
    #[command(name = "check-key")]
    CheckKey {
        /// Provider to check (anthropic, openai); defaults to the configured one.
        #[arg(long)]
        provider: Option<String>,

        /// Model to probe with; defaults to a cheap model for the provider.
        #[arg(long)]
        model: Option<String>,
    },

    /// Show the resolved configuration and API key availability.
    Config,

    /// Send a single governed prompt and print the response.
    Ask {
        /// The prompt text.
        prompt: String,

        /// Use the deep-think model instead of the quick-think model.
        #[arg(long)]
        deep: bool,

        /// Override the model entirely.
        #[arg(long)]
        model: Option<String>,
    },
}
