use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::hotspot::VerificationResult;

use super::backend_status;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    fn verified(user: String) -> Self {
        Self {
            success: true,
            user: Some(user),
            message: None,
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message.to_string()),
        }
    }
}

/// POST /login
///
/// Checks hotspot credentials against the router's user directory.
/// Input shape is validated before any pool interaction.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let (Some(username), Some(password)) = (req.username.as_deref(), req.password.as_deref())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse::failed("username and password are required")),
        )
            .into_response();
    };

    match state.verifier.verify(username, password).await {
        VerificationResult::Verified { user } => {
            tracing::debug!("Login verified for {}", user);
            (StatusCode::OK, Json(LoginResponse::verified(user))).into_response()
        }
        VerificationResult::Rejected(reason) => {
            // Expected outcome, not an operational error
            tracing::debug!("Login rejected for {}: {:?}", username, reason);
            (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::failed("invalid credentials")),
            )
                .into_response()
        }
        VerificationResult::Unavailable(e) => {
            tracing::error!("Credential check unavailable for {}: {}", username, e);
            (
                backend_status(&e),
                Json(LoginResponse::failed("router unavailable")),
            )
                .into_response()
        }
    }
}
