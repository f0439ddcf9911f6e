//! HTTP API module for the hotspot gateway
//!
//! Provides the REST endpoints in front of the router.
//!
//! # Endpoints
//! - `POST /login` - hotspot credential check
//! - `GET /stats` - active session traffic counters
//! - `GET /health` - service health and pool occupancy

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::config::Config;
use crate::hotspot::{CredentialVerifier, SessionStatsFetcher};
use crate::routeros::ConnectionPool;

/// Application state shared with endpoints
pub struct AppState {
    pub config: Config,
    pub pool: Arc<ConnectionPool>,
    pub verifier: CredentialVerifier,
    pub stats: SessionStatsFetcher,
}

impl AppState {
    /// Builds the shared state, wiring verifier and fetcher to one pool
    #[must_use]
    pub fn new(config: Config) -> Self {
        let pool = Arc::new(ConnectionPool::new(config.router.clone(), config.pool));
        Self {
            verifier: CredentialVerifier::with_pool(pool.clone()),
            stats: SessionStatsFetcher::with_pool(pool.clone()),
            pool,
            config,
        }
    }
}

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(handlers::login_handler))
        .route("/stats", get(handlers::stats_handler))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
