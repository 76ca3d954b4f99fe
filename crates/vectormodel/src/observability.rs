//! Structured logging setup for the host service

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, VectorModelError};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Must be called once at startup.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result.map_err(|e| VectorModelError::Config {
        message: format!("Failed to initialize tracing subscriber: {}", e),
        key: Some("logging".to_string()),
    })
}
