// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Read-only views of the router's hotspot tables and parsing helpers

use thiserror::Error;

use crate::routeros::{PoolError, RouterError, Sentence};

/// Entry in the router's hotspot user directory
#[derive(Debug, Clone)]
pub struct HotspotUser {
    pub name: String,
    /// Credential exactly as the directory stores it
    pub password: String,
    pub disabled: bool,
}

/// Live hotspot client session with traffic counters
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub user: String,
    /// RouterOS row id (`*` followed by hex)
    pub session_id: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Byte counters of one active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTraffic {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Failure talking to the router on behalf of a request
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Why a credential check was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotFound,
    BadPassword,
    Disabled,
}

/// Outcome of a credential check
///
/// `Rejected` is an expected business outcome; `Unavailable` means the
/// answer is unknown because the router could not be consulted. The
/// gateway maps them to 401 and 5xx respectively.
#[derive(Debug)]
pub enum VerificationResult {
    Verified { user: String },
    Rejected(RejectReason),
    Unavailable(BackendError),
}

pub(crate) fn parse_hotspot_users(sentences: &[Sentence]) -> Vec<HotspotUser> {
    let mut out = Vec::new();
    for s in sentences {
        if let Some(name) = s.get("name") {
            out.push(HotspotUser {
                name: name.clone(),
                password: s.get("password").cloned().unwrap_or_default(),
                disabled: s.get("disabled").is_some_and(|v| v == "true"),
            });
        }
    }
    out
}

pub(crate) fn parse_active_sessions(sentences: &[Sentence]) -> Vec<ActiveSession> {
    let mut out = Vec::new();
    for s in sentences {
        if let Some(user) = s.get("user") {
            out.push(ActiveSession {
                user: user.clone(),
                session_id: s.get(".id").cloned().unwrap_or_default(),
                bytes_in: s.get("bytes-in").and_then(|v| v.parse().ok()).unwrap_or(0),
                bytes_out: s.get("bytes-out").and_then(|v| v.parse().ok()).unwrap_or(0),
            });
        }
    }
    out
}

/// Picks the most recently created session.
///
/// RouterOS allocates row ids monotonically, so the numerically greatest
/// id is the newest session.
pub(crate) fn latest_session(sessions: Vec<ActiveSession>) -> Option<ActiveSession> {
    sessions
        .into_iter()
        .max_by_key(|s| session_ordinal(&s.session_id))
}

fn session_ordinal(id: &str) -> u64 {
    id.strip_prefix('*')
        .and_then(|hex| u64::from_str_radix(hex, 16).ok())
        .unwrap_or(0)
}
