use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{error::AppError, routes::InsightsParams, state::AppState};

/// `GET /api/insights/conversions` - Conversion totals, rate, and breakdowns.
pub async fn get_conversions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightsParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.into_query()?;
    let summary = state.insights.conversions(&query).await?;
    Ok(Json(json!({ "data": summary })))
}
