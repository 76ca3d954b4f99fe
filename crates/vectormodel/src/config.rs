//! Service configuration
//!
//! Layered loading: built-in defaults < optional `config/vectormodel.{toml,yaml,json}` <
//! environment variables prefixed with `VECTORMODEL` (nested keys separated by `__`).
//!
//! # Environment Variables
//!
//! - `VECTORMODEL__SERVER__HOST`, `VECTORMODEL__SERVER__PORT`, `VECTORMODEL__SERVER__WORKERS`
//! - `VECTORMODEL__MODEL__FACTORS_PATH`: JSON file of item factor vectors
//! - `VECTORMODEL__MODEL__CONFIDENCE` (default: 40.0)
//! - `VECTORMODEL__MODEL__REGULARIZATION` (default: 0.01)
//! - `VECTORMODEL__LOGGING__LEVEL` (default: "info"), `VECTORMODEL__LOGGING__FORMAT` ("json" or "pretty")

use crate::error::{Result, VectorModelError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "config/vectormodel";
const ENV_PREFIX: &str = "VECTORMODEL";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    /// Server port (default: 8083)
    pub port: u16,

    /// Worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// JSON object mapping item id to factor vector
    pub factors_path: String,

    /// Weight applied to every consumed item
    pub confidence: f64,

    /// Ridge term of the per-user normal equations
    pub regularization: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            factors_path: "data/item_factors.json".to_string(),
            confidence: 40.0,
            regularization: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `config/vectormodel` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::build(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Load configuration from an explicit file, still honouring environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(config::File::from(path.as_ref()))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.model.validate()?;
        self.logging.validate()
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(VectorModelError::config(
                "port must be greater than 0",
                "server.port",
            ));
        }

        if self.workers == 0 {
            return Err(VectorModelError::config(
                "workers must be greater than 0",
                "server.workers",
            ));
        }

        Ok(())
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.factors_path.trim().is_empty() {
            return Err(VectorModelError::config(
                "factors_path must not be empty",
                "model.factors_path",
            ));
        }

        // confidence < 1 would subtract item outer products from YtY
        if !self.confidence.is_finite() || self.confidence < 1.0 {
            return Err(VectorModelError::config(
                format!("confidence must be >= 1.0, got {}", self.confidence),
                "model.confidence",
            ));
        }

        if !self.regularization.is_finite() || self.regularization <= 0.0 {
            return Err(VectorModelError::config(
                format!("regularization must be > 0.0, got {}", self.regularization),
                "model.regularization",
            ));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(VectorModelError::config(
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
                "logging.level",
            ));
        }

        Ok(())
    }
}
