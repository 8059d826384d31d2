//! Paceline CLI entry point.
//!
//! Binary name: `pline`
//!
//! Parses CLI arguments, loads `.env` and `config.toml`, then dispatches
//! to the appropriate command handler.

mod cli;

use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,paceline=debug",
        _ => "trace",
    };
    paceline_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Seed the environment from a local .env before any key resolution.
    paceline_infra::config::load_dotenv();

    let data_dir = paceline_infra::config::default_data_dir();
    let config = paceline_infra::config::load_global_config(&data_dir).await;

    let result = match cli.command {
        Commands::CheckKey { provider, model } => {
            cli::check::check_key(&config, provider.as_deref(), model.as_deref(), cli.json).await
        }
        Commands::Config => cli::config::show_config(&config, cli.json),
        Commands::Ask {
            prompt,
            deep,
            model,
        } => cli::ask::ask(&config, &prompt, deep, model.as_deref(), cli.json).await,
    };

    paceline_observe::tracing_setup::shutdown_tracing();
    result
}
