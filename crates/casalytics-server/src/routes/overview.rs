use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{error::AppError, routes::InsightsParams, state::AppState};

/// `GET /api/insights/overview` - All overview facets plus category totals.
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightsParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.into_query()?;
    let report = state.insights.overview(&query).await?;
    Ok(Json(json!({ "data": report })))
}
