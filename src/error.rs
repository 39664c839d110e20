//! Domain-specific error types for fraudscope

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type shared by the prediction service and the submission handler
#[derive(Error, Debug)]
pub enum FraudScopeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Model error: {message}")]
    Model { message: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Page error: {message}")]
    Page { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for FraudScopeError {
    fn from(err: anyhow::Error) -> Self {
        FraudScopeError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FraudScopeError {
    fn from(err: serde_json::Error) -> Self {
        FraudScopeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FraudScopeError {
    fn from(err: reqwest::Error) -> Self {
        FraudScopeError::Transport {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<minijinja::Error> for FraudScopeError {
    fn from(err: minijinja::Error) -> Self {
        FraudScopeError::Template {
            message: err.to_string(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for FraudScopeError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        FraudScopeError::Validation {
            message: format!("Malformed multipart payload: {}", err),
        }
    }
}

/// HTTP status mapping for the service half; missing or non-numeric form
/// fields are 422, everything else is a 500.
impl IntoResponse for FraudScopeError {
    fn into_response(self) -> Response {
        let status = match self {
            FraudScopeError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for fraudscope operations
pub type Result<T> = std::result::Result<T, FraudScopeError>;
