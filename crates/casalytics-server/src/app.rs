use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — permissive CORS; the dashboard frontend is served from a
///    different origin than this API.
///
/// Authorization happens upstream — by the time a request carries a
/// `site_key`, an access-control layer has already vouched for it.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/insights/overview", get(routes::overview::get_overview))
        .route(
            "/api/insights/conversions",
            get(routes::conversions::get_conversions),
        )
        .route("/api/insights/funnel", get(routes::funnel::get_funnel))
        .route(
            "/api/insights/journeys",
            get(routes::journeys::get_journeys),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
