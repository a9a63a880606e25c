use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{error::AppError, routes::InsightsParams, state::AppState};

/// `GET /api/insights/funnel` - Session counts per fixed funnel stage.
pub async fn get_funnel(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightsParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.into_query()?;
    let report = state.insights.funnel(&query).await?;
    Ok(Json(json!({ "data": report })))
}
