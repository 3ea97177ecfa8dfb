pub mod config;
pub mod error;

pub use config::{Config, StorageConfig, Units, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError, WeatherError};

use anyhow::Result;

/// Initialize logging for the dashboard.
///
/// Log lines go to stderr so rendered cards on stdout stay clean.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("Stormdeck core initialized");
    Ok(())
}
