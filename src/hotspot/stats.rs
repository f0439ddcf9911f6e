//! Active session traffic lookup

use std::sync::Arc;

use crate::routeros::ConnectionPool;

use super::types::{BackendError, SessionTraffic, latest_session, parse_active_sessions};

/// Active hotspot session menu on the router
const ACTIVE_MENU: &str = "/ip/hotspot/active/print";

/// Reads traffic counters for a user's live hotspot session
pub struct SessionStatsFetcher {
    pool: Arc<ConnectionPool>,
}

impl SessionStatsFetcher {
    /// Creates a fetcher backed by a shared connection pool
    #[must_use]
    pub fn with_pool(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Fetches byte counters for the user's active session.
    ///
    /// `Ok(None)` means the user has no live session, an expected
    /// condition, not a failure. When several sessions match, the most
    /// recently created one wins.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` when the pool or the router query fails.
    pub async fn fetch(&self, username: &str) -> Result<Option<SessionTraffic>, BackendError> {
        let mut conn = self.pool.acquire().await?;

        let result = conn.query(ACTIVE_MENU, &[("user", username)]).await;
        self.pool.release(conn, result.is_ok()).await;

        let sessions = parse_active_sessions(&result?);
        Ok(latest_session(sessions).map(|s| SessionTraffic {
            bytes_in: s.bytes_in,
            bytes_out: s.bytes_out,
        }))
    }
}
