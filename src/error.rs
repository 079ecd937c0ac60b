// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0} sync is not configured")]
    NotConfigured(&'static str),

    #[error("{provider} authentication failed: {message}")]
    ProviderAuth {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} API error: {message}")]
    ProviderApi {
        provider: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn provider_api(provider: &'static str, message: impl Into<String>) -> Self {
        AppError::ProviderApi {
            provider,
            message: message.into(),
        }
    }

    pub fn provider_auth(provider: &'static str, message: impl Into<String>) -> Self {
        AppError::ProviderAuth {
            provider,
            message: message.into(),
        }
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::NotConfigured(_) => (StatusCode::SERVICE_UNAVAILABLE, "not_configured"),
            AppError::ProviderAuth { .. } => (StatusCode::BAD_GATEWAY, "provider_auth_failed"),
            AppError::ProviderApi { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        let details = match &self {
            AppError::MethodNotAllowed => None,
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                Some(self.to_string())
            }
            AppError::ProviderAuth { .. } | AppError::ProviderApi { .. } => {
                tracing::error!(error = %self, "Upstream provider failure");
                Some(self.to_string())
            }
            _ => Some(self.to_string()),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
