use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// `GET /health` - Liveness: verifies the event store answers a trivial
/// query.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    state.insights.ping().await.map_err(AppError::Internal)?;
    Ok(Json(json!({ "status": "ok" })))
}
