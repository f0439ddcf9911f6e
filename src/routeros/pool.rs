// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Connection pool for managing RouterOS sessions
//!
//! Keeps a bounded set of authenticated connections to one router.
//! `acquire` hands out exclusive ownership of a connection, blocking up to
//! the configured timeout for a free slot; `release` returns it to the
//! idle set or discards it depending on health. A background sweeper
//! closes connections idle past the keepalive threshold.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout};

use super::connection::{RouterError, RouterOsConnection};
use crate::config::{PoolSettings, RouterEndpoint};

/// Delay before the single retry of a failed TCP connect
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// How often the background sweeper prunes expired idle connections
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Errors from `ConnectionPool::acquire`
#[derive(Debug, Error)]
pub enum PoolError {
    /// No slot became free within the acquire timeout
    #[error("connection pool exhausted")]
    Exhausted,

    /// The router rejected the configured API credentials
    #[error("router authentication failed: {0}")]
    AuthFailed(String),

    /// Open attempts keep failing; refusing to hammer the router
    #[error("router connection backing off after {failures} consecutive failures")]
    Backoff { failures: u32 },

    /// Connect or protocol failure while opening a session
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Connection pool for reusing RouterOS sessions
pub struct ConnectionPool {
    endpoint: RouterEndpoint,
    settings: PoolSettings,
    idle: Mutex<VecDeque<IdleConnection>>,
    slots: Arc<Semaphore>,
    open_state: Mutex<OpenState>,
}

struct IdleConnection {
    conn: RouterOsConnection,
    since: Instant,
}

/// An authenticated connection checked out of the pool
///
/// Holds the slot permit for as long as it lives. Return it with
/// [`ConnectionPool::release`]; dropping it instead discards the
/// physical connection and frees the slot.
#[derive(Debug)]
pub struct PooledConnection {
    conn: RouterOsConnection,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = RouterOsConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

/// Pool occupancy snapshot for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub capacity: usize,
    pub in_use: usize,
    pub idle: usize,
    pub consecutive_open_failures: u32,
    pub has_connected: bool,
}

/// Tracks connect/login failure state for backoff
struct OpenState {
    consecutive_failures: u32,
    last_failure: Option<Instant>,
    last_success: Option<Instant>,
}

impl OpenState {
    fn new() -> Self {
        Self {
            consecutive_failures: 0,
            last_failure: None,
            last_success: None,
        }
    }

    fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.last_success = Some(Instant::now());
    }

    fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure = Some(Instant::now());
    }

    fn backoff_delay(&self) -> Duration {
        // Exponential backoff: 2^n seconds, max 5 minutes
        let base_delay = 2u64.pow(self.consecutive_failures.min(8));
        Duration::from_secs(base_delay.min(300))
    }

    fn should_skip_attempt(&self) -> bool {
        if self.consecutive_failures < 3 {
            return false;
        }

        if let Some(last_failure) = self.last_failure {
            last_failure.elapsed() < self.backoff_delay()
        } else {
            false
        }
    }
}

impl ConnectionPool {
    #[must_use]
    pub fn new(endpoint: RouterEndpoint, settings: PoolSettings) -> Self {
        Self {
            endpoint,
            settings,
            idle: Mutex::new(VecDeque::new()),
            slots: Arc::new(Semaphore::new(settings.max_connections)),
            open_state: Mutex::new(OpenState::new()),
        }
    }

    /// Checks a connection out of the pool.
    ///
    /// Waits up to the configured acquire timeout for a free slot, then
    /// reuses a fresh idle connection or opens and authenticates a new
    /// one. Authentication happens exactly once per physical connection.
    ///
    /// # Errors
    ///
    /// `Exhausted` when no slot frees up in time, `AuthFailed` when the
    /// router rejects the API credentials, `Backoff` while repeated open
    /// failures are inside their backoff window, `Router` for connect or
    /// protocol faults.
    pub async fn acquire(&self) -> Result<PooledConnection, PoolError> {
        let permit = match timeout(
            self.settings.acquire_timeout,
            self.slots.clone().acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(PoolError::Exhausted),
            Err(_) => {
                tracing::warn!(
                    "Pool for {} exhausted: no slot within {:?}",
                    self.endpoint.address,
                    self.settings.acquire_timeout
                );
                return Err(PoolError::Exhausted);
            }
        };

        loop {
            let entry = self.idle.lock().await.pop_front();
            let Some(entry) = entry else { break };
            if entry.since.elapsed() < self.settings.idle_timeout {
                tracing::debug!("Reusing pooled connection to {}", self.endpoint.address);
                return Ok(PooledConnection {
                    conn: entry.conn,
                    _permit: permit,
                });
            }
            tracing::debug!("Discarding idle connection past keepalive threshold");
        }

        self.open(permit).await
    }

    /// Returns a connection to the pool.
    ///
    /// With `healthy: false` the connection is discarded and its slot
    /// freed immediately; otherwise it joins the idle set for reuse.
    pub async fn release(&self, conn: PooledConnection, healthy: bool) {
        let PooledConnection { conn, _permit } = conn;

        if healthy {
            tracing::debug!("Returning connection to pool for {}", self.endpoint.address);
            let mut idle = self.idle.lock().await;
            idle.push_back(IdleConnection {
                conn,
                since: Instant::now(),
            });
        } else {
            tracing::debug!(
                "Discarding unhealthy connection to {}",
                self.endpoint.address
            );
        }
        // permit drops here and wakes one waiting acquire
    }

    async fn open(&self, permit: OwnedSemaphorePermit) -> Result<PooledConnection, PoolError> {
        {
            let state = self.open_state.lock().await;
            if state.should_skip_attempt() {
                tracing::debug!(
                    "Skipping connect to {} ({} consecutive failures, backoff {:?})",
                    self.endpoint.address,
                    state.consecutive_failures,
                    state.backoff_delay()
                );
                return Err(PoolError::Backoff {
                    failures: state.consecutive_failures,
                });
            }
        }

        tracing::debug!("Opening new connection to {}", self.endpoint.address);
        let mut conn = match self.connect_with_retry().await {
            Ok(conn) => conn,
            Err(e) => {
                self.note_open_failure().await;
                return Err(PoolError::Router(e));
            }
        };

        match conn
            .login(&self.endpoint.username, &self.endpoint.password)
            .await
        {
            Ok(()) => {
                self.note_open_success().await;
                Ok(PooledConnection {
                    conn,
                    _permit: permit,
                })
            }
            Err(RouterError::AuthFailed(msg)) => {
                self.note_open_failure().await;
                Err(PoolError::AuthFailed(msg))
            }
            Err(e) => {
                self.note_open_failure().await;
                Err(PoolError::Router(e))
            }
        }
    }

    async fn connect_with_retry(&self) -> Result<RouterOsConnection, RouterError> {
        let call_timeout = self.settings.call_timeout;
        match RouterOsConnection::connect(&self.endpoint.address, call_timeout).await {
            Ok(conn) => Ok(conn),
            Err(RouterError::Io(_) | RouterError::Timeout(_)) => {
                // One retry for transient connect faults; auth errors are
                // definitive and never reach this path
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                RouterOsConnection::connect(&self.endpoint.address, call_timeout).await
            }
            Err(e) => Err(e),
        }
    }

    async fn note_open_success(&self) {
        let mut state = self.open_state.lock().await;
        state.record_success();
    }

    async fn note_open_failure(&self) {
        let mut state = self.open_state.lock().await;
        state.record_failure();
    }

    /// Closes idle connections older than the keepalive threshold
    pub async fn sweep(&self) {
        let mut idle = self.idle.lock().await;
        let before = idle.len();
        idle.retain(|entry| entry.since.elapsed() < self.settings.idle_timeout);
        let dropped = before - idle.len();
        if dropped > 0 {
            tracing::debug!(
                "Closed {} idle connection(s) to {} past keepalive threshold",
                dropped,
                self.endpoint.address
            );
        }
    }

    /// Pool occupancy snapshot
    pub async fn stats(&self) -> PoolStats {
        let idle = self.idle.lock().await.len();
        let state = self.open_state.lock().await;
        let capacity = self.settings.max_connections;
        PoolStats {
            capacity,
            in_use: capacity.saturating_sub(self.slots.available_permits()),
            idle,
            consecutive_open_failures: state.consecutive_failures,
            has_connected: state.last_success.is_some(),
        }
    }

    /// Starts the background task pruning expired idle connections
    pub fn spawn_sweeper(
        pool: Arc<ConnectionPool>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        pool.sweep().await;
                    },
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("Stopping connection pool sweeper");
                            break;
                        }
                    }
                }
            }
        })
    }
}
