// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod health;
mod login;
mod stats;

pub use health::health_check;
pub use login::login_handler;
pub use stats::stats_handler;

use axum::http::StatusCode;

use crate::hotspot::BackendError;
use crate::routeros::PoolError;

/// Maps backend faults to gateway status codes.
///
/// Pool saturation and backoff are retryable (503); everything else is a
/// router-side fault (502). Business rejections never reach this mapping.
pub(super) fn backend_status(err: &BackendError) -> StatusCode {
    match err {
        BackendError::Pool(PoolError::Exhausted | PoolError::Backoff { .. }) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}
