//! Error types for the vector model engine and its host service.

use crate::factors::ItemId;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

pub type Result<T> = std::result::Result<T, VectorModelError>;

#[derive(Debug, thiserror::Error)]
pub enum VectorModelError {
    /// An item vector disagrees in length with the first vector seen.
    #[error("Invalid vector size for item {item_id}: expected {expected} factors, got {actual}")]
    InvalidDimension {
        item_id: ItemId,
        expected: usize,
        actual: usize,
    },

    #[error("Item {0} appears more than once in the factor input")]
    DuplicateItem(ItemId),

    /// None of the consumed items exist in the model.
    #[error("No seen doc is in model. History: {history} Model: {model}")]
    InsufficientHistory { history: usize, model: usize },

    /// The per-user normal equations could not be Cholesky-factorized.
    #[error("Failed to run Cholesky factorization: {0}")]
    SingularSystem(String),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        key: Option<String>,
    },

    #[error("Failed to load item factors: {0}")]
    Load(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl VectorModelError {
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        VectorModelError::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether the error only concerns the request that triggered it.
    ///
    /// Request-scoped failures leave the model untouched; callers typically fall back to a
    /// non-personalized list.
    pub fn is_request_scoped(&self) -> bool {
        matches!(
            self,
            VectorModelError::InsufficientHistory { .. }
                | VectorModelError::SingularSystem(_)
                | VectorModelError::InvalidRequest(_)
        )
    }
}

impl From<config::ConfigError> for VectorModelError {
    fn from(err: config::ConfigError) -> Self {
        VectorModelError::Config {
            message: err.to_string(),
            key: None,
        }
    }
}

impl ResponseError for VectorModelError {
    fn status_code(&self) -> StatusCode {
        match self {
            VectorModelError::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            VectorModelError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            VectorModelError::InsufficientHistory { .. } => "insufficient_history",
            VectorModelError::SingularSystem(_) => "singular_system",
            VectorModelError::InvalidRequest(_) => "invalid_request",
            _ => "internal_error",
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": error,
            "error_description": self.to_string()
        }))
    }
}
