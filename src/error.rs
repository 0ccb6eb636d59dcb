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
    /// No token has ever been obtained; the user must start the OAuth flow.
    #[error("Not authenticated with Strava")]
    Unauthenticated,

    /// The stored refresh token was rejected or the refresh call failed;
    /// the user must re-authenticate.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Network-level failure (including timeout) talking to Strava.
    #[error("Strava request failed: {0}")]
    FetchFailed(String),

    /// Strava answered with a non-2xx status.
    #[error("Strava API error: HTTP {status}: {body}")]
    UpstreamError { status: u16, body: String },

    /// Strava answered 2xx but the body was not the expected JSON.
    #[error("Failed to decode Strava response: {0}")]
    DecodeFailed(String),

    /// The activity cache file does not exist yet.
    #[error("Activity cache not found")]
    CacheMissing,

    /// The activity cache file exists but is not valid JSON.
    #[error("Activity cache is corrupt: {0}")]
    CorruptCache(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this failure requires the user to go through OAuth again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, AppError::Unauthenticated | AppError::RefreshFailed(_))
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
        let (status, error, details) = match &self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                Some("Log in with Strava to continue".to_string()),
            ),
            AppError::RefreshFailed(msg) => (
                StatusCode::UNAUTHORIZED,
                "refresh_failed",
                Some(format!("Re-authentication required: {}", msg)),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::FetchFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone()))
            }
            AppError::UpstreamError { status, body } => (
                StatusCode::BAD_GATEWAY,
                "strava_error",
                Some(format!("HTTP {}: {}", status, body)),
            ),
            AppError::DecodeFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone()))
            }
            AppError::CacheMissing => (
                StatusCode::NOT_FOUND,
                "cache_missing",
                Some("No activity data yet; fetch with /api/activities?refresh=true".to_string()),
            ),
            AppError::CorruptCache(msg) => {
                tracing::error!(error = %msg, "Corrupt activity cache");
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_cache", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
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
