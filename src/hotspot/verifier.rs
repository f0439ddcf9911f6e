//! Hotspot credential verification

use std::sync::Arc;

use crate::routeros::ConnectionPool;

use super::types::{HotspotUser, RejectReason, VerificationResult, parse_hotspot_users};

/// Hotspot user directory menu on the router
const USER_MENU: &str = "/ip/hotspot/user/print";

/// Checks captive-portal credentials against the router's user directory
pub struct CredentialVerifier {
    pool: Arc<ConnectionPool>,
}

impl CredentialVerifier {
    /// Creates a verifier backed by a shared connection pool
    #[must_use]
    pub fn with_pool(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Verifies a username/password pair.
    ///
    /// Queries the directory filtered by username and applies one match
    /// policy: no record is `Rejected(NotFound)`, a disabled record is
    /// `Rejected(Disabled)`, a credential mismatch is
    /// `Rejected(BadPassword)`. Connection or query failure is
    /// `Unavailable`, never a rejection.
    ///
    /// The comparison is plaintext equality against the stored credential,
    /// the scheme the hotspot directory supports; it gates captive-portal
    /// accounts and is not a security boundary.
    pub async fn verify(&self, username: &str, password: &str) -> VerificationResult {
        let mut conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => return VerificationResult::Unavailable(e.into()),
        };

        let result = conn.query(USER_MENU, &[("name", username)]).await;
        self.pool.release(conn, result.is_ok()).await;

        match result {
            Ok(sentences) => match_policy(parse_hotspot_users(&sentences), username, password),
            Err(e) => VerificationResult::Unavailable(e.into()),
        }
    }
}

fn match_policy(users: Vec<HotspotUser>, username: &str, password: &str) -> VerificationResult {
    let Some(user) = users.into_iter().find(|u| u.name == username) else {
        return VerificationResult::Rejected(RejectReason::NotFound);
    };
    if user.disabled {
        return VerificationResult::Rejected(RejectReason::Disabled);
    }
    if user.password != password {
        return VerificationResult::Rejected(RejectReason::BadPassword);
    }
    VerificationResult::Verified { user: user.name }
}
