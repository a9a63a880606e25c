use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use casalytics_core::error::InsightsError;

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type. Upstream
/// failures keep the failing template's name in the payload; a valid-but-
/// empty result never travels through here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Insights(#[from] InsightsError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::Insights(
                err @ (InsightsError::MissingSiteKey | InsightsError::InvalidDateRange(_)),
            ) => (StatusCode::BAD_REQUEST, "validation_error", err.to_string()),
            AppError::Insights(InsightsError::QueryFailed { name, source }) => {
                tracing::error!(query = %name, error = %source, "Upstream query failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_query_failed",
                    format!("query '{name}' failed"),
                )
            }
            AppError::Insights(err @ InsightsError::Timeout { .. }) => {
                tracing::error!("Insights aggregation timed out: {err}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "upstream_timeout",
                    err.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "field": null
                }
            })),
        )
            .into_response()
    }
}
