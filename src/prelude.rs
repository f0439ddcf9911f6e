// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use hotspot_gateway::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, PoolSettings, RouterEndpoint};
pub use crate::error::{AppError, Result};

// HTTP layer
pub use crate::api::{AppState, create_router};

// Hotspot services
pub use crate::hotspot::{
    ActiveSession, BackendError, CredentialVerifier, HotspotUser, RejectReason,
    SessionStatsFetcher, SessionTraffic, VerificationResult,
};

// RouterOS client
pub use crate::routeros::{
    ConnectionPool, PoolError, PoolStats, PooledConnection, RouterError, RouterOsConnection,
};
