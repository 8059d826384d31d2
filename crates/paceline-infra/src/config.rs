//! Global configuration loader for Paceline.
//!
//! Reads `config.toml` from the data directory (`~/.paceline/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed. Also handles `.env`
//! loading so API keys can live next to the project instead of the shell
//! profile.

use std::path::{Path, PathBuf};

use paceline_types::config::GlobalConfig;

/// Load environment variables from a `.env` file in the working
/// directory, if one exists.
///
/// Call once at startup, before any credential resolution. Missing files
/// are normal; anything else is worth a warning but never fatal.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment variables from {}", path.display());
        }
        Err(err) if err.not_found() => {}
        Err(err) => {
            tracing::warn!("Failed to load .env file: {err}");
        }
    }
}

/// Resolve the data directory holding `config.toml`.
///
/// `PACELINE_DATA_DIR` overrides the default of `~/.paceline`; with no
/// home directory available, falls back to `.paceline` in the working
/// directory.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PACELINE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".paceline"))
        .unwrap_or_else(|| PathBuf::from(".paceline"))
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}
