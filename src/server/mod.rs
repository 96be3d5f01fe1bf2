pub mod routes;

use crate::errors::EngineError;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// API routes. The binary adds CORS and static file serving on top.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/counters", get(routes::get_counters))
        .route("/api/strategies", get(routes::list_strategies))
        .route("/api/options/price", post(routes::price_option))
        .route("/api/backtest", post(routes::run_backtest))
        .route("/api/backtest/report", post(routes::run_report))
        .route("/api/metrics", post(routes::compute_metrics))
        .with_state(state)
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::Domain(_) | EngineError::Overflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::Config(_) | EngineError::Io(_) | EngineError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (status, Json(body)).into_response()
    }
}
