use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::routeros::PoolStats;

/// Health check endpoint response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pool: PoolStats,
}

/// GET /health
///
/// Simple health check endpoint for monitoring service status.
/// Returns "ok" with the application version and a pool snapshot.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pool: state.pool.stats().await,
    };

    (StatusCode::OK, Json(response))
}
