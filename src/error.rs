//! Error types for the relay.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors raised while loading the forwarding targets at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid target entry {0:?}, expected name=url")]
    MalformedTarget(String),

    #[error("duplicate target name {0:?}")]
    DuplicateTarget(String),

    #[error("a \"default\" target is required")]
    MissingDefault,
}

/// Errors from a single call to the upstream webhook.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Network failure talking to the webhook
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The webhook answered with something that is not JSON
    #[error("Invalid response from upstream: {body}")]
    InvalidResponse { body: String },
}

/// Request outcomes that are reported to the caller with a specific status.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    RateLimited,
    InvalidInput(String),
    /// Upstream answered with a non-zero errcode; the body is passed through
    UpstreamRejected(Value),
    Internal(String),
}

impl From<ForwardError> for AppError {
    fn from(e: ForwardError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Webhook not found" }),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Rate limit exceeded. Please try again later." }),
            ),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::UpstreamRejected(body) => (StatusCode::BAD_REQUEST, body),
            AppError::Internal(msg) => {
                tracing::error!("Server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "details": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
