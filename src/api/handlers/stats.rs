use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;

use super::backend_status;

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub user: Option<String>,
}

/// Stats endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "bytesIn")]
    pub bytes_in: u64,
    #[serde(rename = "bytesOut")]
    pub bytes_out: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsErrorResponse {
    pub error: String,
}

/// GET /stats?user=<name>
///
/// Returns traffic counters of the user's active hotspot session. A user
/// with no live session gets zero counters, not an error.
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Response {
    let Some(user) = params.user.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(StatsErrorResponse {
                error: "missing 'user' query parameter".to_string(),
            }),
        )
            .into_response();
    };

    match state.stats.fetch(user).await {
        Ok(Some(traffic)) => (
            StatusCode::OK,
            Json(StatsResponse {
                bytes_in: traffic.bytes_in,
                bytes_out: traffic.bytes_out,
            }),
        )
            .into_response(),
        Ok(None) => {
            tracing::debug!("No active session for {}", user);
            (
                StatusCode::OK,
                Json(StatsResponse {
                    bytes_in: 0,
                    bytes_out: 0,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Stats fetch failed for {}: {}", user, e);
            (
                backend_status(&e),
                Json(StatsErrorResponse {
                    error: "failed to fetch stats".to_string(),
                }),
            )
                .into_response()
        }
    }
}
