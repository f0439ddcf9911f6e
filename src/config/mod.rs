// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the hotspot gateway
//!
//! Loads configuration from environment variables (with `.env` support).
//! Router address and admin credentials are required: the gateway refuses
//! to start without them rather than falling back to built-in defaults.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::AppError;


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:3000";
    pub const POOL_MAX_CONNECTIONS: usize = 4;
    pub const POOL_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 300;
    pub const CALL_TIMEOUT_SECS: u64 = 3;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const ROUTEROS_ADDRESS: &str = "ROUTEROS_ADDRESS";
    pub const ROUTEROS_USERNAME: &str = "ROUTEROS_USERNAME";
    pub const ROUTEROS_PASSWORD: &str = "ROUTEROS_PASSWORD";
    pub const POOL_MAX_CONNECTIONS: &str = "POOL_MAX_CONNECTIONS";
    pub const POOL_ACQUIRE_TIMEOUT_SECONDS: &str = "POOL_ACQUIRE_TIMEOUT_SECONDS";
    pub const POOL_IDLE_TIMEOUT_SECONDS: &str = "POOL_IDLE_TIMEOUT_SECONDS";
    pub const ROUTEROS_CALL_TIMEOUT_SECONDS: &str = "ROUTEROS_CALL_TIMEOUT_SECONDS";
}

/// Address and admin credentials of the managed router
#[derive(Debug, Clone)]
pub struct RouterEndpoint {
    pub address: String,
    pub username: String,
    pub password: SecretString,
}

impl RouterEndpoint {
    /// Validates the endpoint configuration
    pub fn validate(&self) -> Result<(), String> {
        // Validate address format (must contain port)
        if !self.address.contains(':') {
            return Err(format!(
                "Invalid address format '{}': expected 'host:port'",
                self.address
            ));
        }

        if self.username.trim().is_empty() {
            return Err("Router API username cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Connection pool sizing and timeout knobs
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    /// Maximum number of physical connections to the router
    pub max_connections: usize,
    /// How long `acquire()` waits for a free slot before failing
    pub acquire_timeout: Duration,
    /// Idle connections older than this are closed by the sweeper
    pub idle_timeout: Duration,
    /// Upper bound on a single RouterOS command round-trip
    pub call_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            max_connections: defaults::POOL_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(defaults::POOL_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(defaults::POOL_IDLE_TIMEOUT_SECS),
            call_timeout: Duration::from_secs(defaults::CALL_TIMEOUT_SECS),
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub router: RouterEndpoint,
    pub pool: PoolSettings,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is unset or a
    /// value fails validation. There are deliberately no fallback values
    /// for the router address and credentials.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let server_addr = std::env::var(env_vars::SERVER_ADDR)
            .unwrap_or_else(|_| defaults::SERVER_ADDR.to_string());

        let router = RouterEndpoint {
            address: require(env_vars::ROUTEROS_ADDRESS)?,
            username: require(env_vars::ROUTEROS_USERNAME)?,
            password: SecretString::from(require(env_vars::ROUTEROS_PASSWORD)?),
        };
        router.validate().map_err(AppError::Config)?;

        let pool = PoolSettings {
            max_connections: parsed_or(
                env_vars::POOL_MAX_CONNECTIONS,
                defaults::POOL_MAX_CONNECTIONS,
            ),
            acquire_timeout: secs_or(
                env_vars::POOL_ACQUIRE_TIMEOUT_SECONDS,
                defaults::POOL_ACQUIRE_TIMEOUT_SECS,
            ),
            idle_timeout: secs_or(
                env_vars::POOL_IDLE_TIMEOUT_SECONDS,
                defaults::POOL_IDLE_TIMEOUT_SECS,
            ),
            call_timeout: secs_or(
                env_vars::ROUTEROS_CALL_TIMEOUT_SECONDS,
                defaults::CALL_TIMEOUT_SECS,
            ),
        };

        if pool.max_connections == 0 {
            return Err(AppError::Config(format!(
                "{} must be at least 1",
                env_vars::POOL_MAX_CONNECTIONS
            )));
        }

        Ok(Config {
            server_addr,
            router,
            pool,
        })
    }
}

fn require(name: &str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Config(format!("{name} is not set"))),
    }
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn secs_or(name: &str, default: u64) -> Duration {
    Duration::from_secs(parsed_or(name, default))
}
