pub mod config;
pub mod error;

pub use config::{Config, ResponsesConfig, RetrySettings, ServiceConfig, ValidationResult};
pub use error::{AppError, AuthError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging for the rsvp client.
///
/// Honors `RUST_LOG`, falling back to `info`.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("rsvp core initialized");
    Ok(())
}
